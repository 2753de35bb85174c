use std::env;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_EMPTY_REPLIES, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};

/// Environment variable consulted when no endpoint is given explicitly.
pub const ENDPOINT_ENV_VAR: &str = "PARLEY_ENDPOINT";

/// Source of assistant replies.
///
/// `Ok(Some(reply))` is a usable reply.  `Ok(None)` means the endpoint answered
/// but the answer carried no reply text.  `Err(_)` means the request failed.
#[async_trait::async_trait]
pub trait ReplyEndpoint: Send + Sync {
    /// Sends one user message and waits for the reply.
    async fn request_reply(&self, text: &str) -> Result<Option<String>>;

    /// Human-readable description of where replies come from.
    fn describe(&self) -> String {
        "custom endpoint".to_string()
    }
}

#[derive(Serialize)]
struct ReplyRequest<'a> {
    message: &'a str,
}

/// HTTP client for a JSON reply endpoint.
///
/// Every request is a `POST` with body `{"message": <text>}`.  No retries are
/// made and, unless a timeout is configured, a request may wait forever.
#[derive(Debug, Clone)]
pub struct ReplyClient {
    client: ReqwestClient,
    endpoint: Url,
    timeout: Option<Duration>,
}

impl ReplyClient {
    /// Create a new reply client.
    ///
    /// The endpoint can be provided directly or read from the PARLEY_ENDPOINT
    /// environment variable.
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        Self::with_options(endpoint, None)
    }

    /// Create a new client with an optional request timeout.
    pub fn with_options(endpoint: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint,
            None => env::var(ENDPOINT_ENV_VAR).map_err(|_| {
                Error::validation(
                    "endpoint not provided and PARLEY_ENDPOINT environment variable not set",
                    Some("endpoint".to_string()),
                )
            })?,
        };
        let endpoint = parse_endpoint(&endpoint)?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Returns the request timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    async fn post(&self, text: &str) -> Result<Option<String>> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(self.default_headers())
            .json(&ReplyRequest { message: text })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        // The status only informs logging; the body alone decides the outcome.
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "reply endpoint returned non-success status");
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                Error::http_client(
                    format!("Failed to read response body: {}", e),
                    Some(Box::new(e)),
                )
            }
        })?;

        let reply = interpret_reply_body(&body)?;
        if reply.is_none() {
            tracing::info!(
                status = status.as_u16(),
                "reply endpoint answered without a message"
            );
        }
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl ReplyEndpoint for ReplyClient {
    async fn request_reply(&self, text: &str) -> Result<Option<String>> {
        CLIENT_REQUESTS.click();
        tracing::debug!(endpoint = %self.endpoint, bytes = text.len(), "requesting reply");

        let start = Instant::now();
        let result = self.post(text).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        match &result {
            Ok(Some(_)) => {}
            Ok(None) => CLIENT_EMPTY_REPLIES.click(),
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                tracing::warn!(error = %err, endpoint = %self.endpoint, "reply request failed");
            }
        }
        result
    }

    fn describe(&self) -> String {
        self.endpoint.to_string()
    }
}

/// Parses and checks an endpoint URL.
///
/// Only `http` and `https` URLs are accepted.
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::validation(
            format!("unsupported endpoint scheme: {scheme}"),
            Some("endpoint".to_string()),
        )),
    }
}

/// Interprets a response body from the reply endpoint.
///
/// The body is decoded as UTF-8 the way browsers do: a leading byte order
/// mark is dropped and invalid sequences become U+FFFD.
///
/// - not JSON, or JSON `null`: error
/// - an object whose `message` is a non-empty string: that string
/// - any other JSON value: `None`
pub fn interpret_reply_body(body: &[u8]) -> Result<Option<String>> {
    let text = String::from_utf8_lossy(body);
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);
    let value: Value = serde_json::from_str(text)?;

    match value {
        Value::Null => Err(Error::serialization("response body is null", None)),
        Value::Object(mut fields) => match fields.remove("message") {
            Some(Value::String(reply)) if !reply.is_empty() => Ok(Some(reply)),
            _ => Ok(None),
        },
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = ReplyClient::new(Some("http://localhost:8080/chat".to_string())).unwrap();
        assert_eq!(client.endpoint().as_str(), "http://localhost:8080/chat");
        assert!(client.timeout().is_none());

        let client = ReplyClient::with_options(
            Some("https://example.com/reply".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(client.describe(), "https://example.com/reply");
    }

    #[test]
    fn rejects_bad_endpoints() {
        let err = ReplyClient::new(Some("not a url".to_string())).unwrap_err();
        assert!(err.is_url());

        let err = ReplyClient::new(Some("ftp://example.com/".to_string())).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn reply_text_is_extracted() {
        let reply = interpret_reply_body(br#"{"message": "hello"}"#).unwrap();
        assert_eq!(reply.as_deref(), Some("hello"));

        let reply =
            interpret_reply_body(br#"{"message": "hi", "timestamp": "abc", "status": "success"}"#)
                .unwrap();
        assert_eq!(reply.as_deref(), Some("hi"));
    }

    #[test]
    fn missing_reply_is_empty() {
        assert_eq!(interpret_reply_body(b"{}").unwrap(), None);
        assert_eq!(
            interpret_reply_body(br#"{"error": "Message is required"}"#).unwrap(),
            None
        );
        assert_eq!(interpret_reply_body(br#"{"message": ""}"#).unwrap(), None);
        assert_eq!(interpret_reply_body(br#"{"message": null}"#).unwrap(), None);
        assert_eq!(interpret_reply_body(br#"{"message": 42}"#).unwrap(), None);
        assert_eq!(interpret_reply_body(b"[1, 2]").unwrap(), None);
        assert_eq!(interpret_reply_body(br#""text""#).unwrap(), None);
    }

    #[test]
    fn byte_order_mark_is_skipped() {
        let reply = interpret_reply_body(b"\xEF\xBB\xBF{\"message\":\"hi\"}").unwrap();
        assert_eq!(reply.as_deref(), Some("hi"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let reply = interpret_reply_body(b"{\"message\":\"h\xFFi\"}").unwrap();
        assert_eq!(reply.as_deref(), Some("h\u{FFFD}i"));
    }

    #[test]
    fn unparseable_body_is_an_error() {
        assert!(
            interpret_reply_body(b"<html>bad gateway</html>")
                .unwrap_err()
                .is_serialization()
        );
        assert!(interpret_reply_body(b"").unwrap_err().is_serialization());
        assert!(interpret_reply_body(b"null").unwrap_err().is_serialization());
    }
}
