//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

/// Greeting the assistant opens a new session with.
pub const DEFAULT_GREETING: &str = "Hello! I'm an intelligent AI assistant. How can I help?";

/// Command-line arguments for the parley-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Reply endpoint URL.
    #[arrrg(optional, "Reply endpoint URL (default: $PARLEY_ENDPOINT)", "URL")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Opening assistant message.
    #[arrrg(optional, "Opening assistant message", "TEXT")]
    pub greeting: Option<String>,

    /// Start with an empty transcript.
    #[arrrg(flag, "Do not show an opening assistant message")]
    pub no_greeting: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Enable debug logging.
    #[arrrg(flag, "Log requests and failures to stderr")]
    pub verbose: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Endpoint URL; `None` defers to the PARLEY_ENDPOINT environment variable.
    pub endpoint: Option<String>,

    /// Optional request timeout.  `None` waits for the endpoint indefinitely.
    pub timeout: Option<Duration>,

    /// Opening assistant message, if any.
    pub greeting: Option<String>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Whether to emit debug logs.
    pub verbose: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Endpoint: from the environment
    /// - Timeout: none
    /// - Greeting: [`DEFAULT_GREETING`]
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            endpoint: None,
            timeout: None,
            greeting: Some(DEFAULT_GREETING.to_string()),
            use_color: true,
            verbose: false,
        }
    }

    /// Sets the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets or clears the greeting.
    pub fn with_greeting(mut self, greeting: Option<String>) -> Self {
        self.greeting = greeting;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let greeting = if args.no_greeting {
            None
        } else {
            Some(args.greeting.unwrap_or_else(|| DEFAULT_GREETING.to_string()))
        };

        ChatConfig {
            endpoint: args.endpoint,
            timeout: args.timeout_secs.map(Duration::from_secs),
            greeting,
            use_color: !args.no_color,
            verbose: args.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert!(config.endpoint.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.greeting.as_deref(), Some(DEFAULT_GREETING));
        assert!(config.use_color);
        assert!(!config.verbose);
    }

    #[test]
    fn config_from_args_defaults() {
        let config = ChatConfig::from(ChatArgs::default());
        assert_eq!(config, ChatConfig::new());
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            endpoint: Some("http://localhost:9000/reply".to_string()),
            timeout_secs: Some(15),
            greeting: Some("Hi!".to_string()),
            no_greeting: false,
            no_color: true,
            verbose: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(
            config.endpoint.as_deref(),
            Some("http://localhost:9000/reply")
        );
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.greeting.as_deref(), Some("Hi!"));
        assert!(!config.use_color);
        assert!(config.verbose);
    }

    #[test]
    fn no_greeting_wins() {
        let args = ChatArgs {
            greeting: Some("Hi!".to_string()),
            no_greeting: true,
            ..ChatArgs::default()
        };
        assert!(ChatConfig::from(args).greeting.is_none());
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_endpoint("https://example.com/chat")
            .with_timeout(Some(Duration::from_secs(5)))
            .with_greeting(None)
            .without_color();

        assert_eq!(config.endpoint.as_deref(), Some("https://example.com/chat"));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert!(config.greeting.is_none());
        assert!(!config.use_color);
    }
}
