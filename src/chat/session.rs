//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the transcript,
//! the draft and the awaiting-reply flag, and drives one request per user
//! message against a [`ReplyEndpoint`].

use crate::chat::config::ChatConfig;
use crate::client::{ReplyClient, ReplyEndpoint};
use crate::error::Result;
use crate::message::{Message, MessageId, Sender, Transcript};
use crate::observability::{CHAT_REJECTED, CHAT_SUBMITS};
use crate::render::Renderer;

/// Assistant text used when the endpoint answers without a reply.
pub const APOLOGY_TEXT: &str = "Sorry, something went wrong.";

/// Assistant text used when the request fails.
pub const NETWORK_ERROR_TEXT: &str = "Sorry, I couldn't get a reply. Please try again.";

/// Why a submit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The draft is empty or only whitespace.
    EmptyDraft,
    /// A reply to an earlier message is still pending.
    AwaitingReply,
}

/// How a request cycle ended.
///
/// Every kind appends exactly one assistant message; the kind only tells
/// which text it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// The endpoint supplied a reply.
    Answered,
    /// The endpoint answered without a reply; the apology text was used.
    Empty,
    /// The request failed; the network-error text was used.
    Failed,
}

/// Result of [`ChatSession::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was appended and no request was issued.
    Rejected(Rejection),
    /// A user message and an assistant message were appended.
    Completed(ReplyKind),
}

/// Ticket for the single in-flight request.
///
/// Produced by [`ChatSession::begin_submit`] and consumed by
/// [`ChatSession::complete`].  While a ticket is outstanding the session
/// refuses new submits.
#[derive(Debug)]
#[must_use = "a pending reply keeps the session busy until it is completed"]
pub struct PendingReply {
    message_id: MessageId,
    text: String,
}

impl PendingReply {
    /// The raw text to send to the endpoint.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Id of the user message this reply answers.
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }
}

/// A chat session that manages conversation state and endpoint interactions.
///
/// The session moves between two states: idle, and sending while exactly one
/// request is outstanding.  Sending always returns to idle, whatever the
/// request's fate.
pub struct ChatSession<E: ReplyEndpoint> {
    endpoint: E,
    transcript: Transcript,
    draft: String,
    pending_id: Option<MessageId>,
    request_count: u64,
    answered_count: u64,
    empty_count: u64,
    failed_count: u64,
    rejected_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Where replies come from.
    pub endpoint: String,
    /// The number of messages in the transcript.
    pub message_count: usize,
    /// Whether a reply is currently awaited.
    pub awaiting_reply: bool,
    /// Total requests issued.
    pub total_requests: u64,
    /// Requests that produced a reply.
    pub answered: u64,
    /// Requests answered without a reply.
    pub empty_replies: u64,
    /// Requests that failed.
    pub failures: u64,
    /// Submits refused because of an empty draft or a pending reply.
    pub rejected_submits: u64,
}

impl ChatSession<ReplyClient> {
    /// Creates a session talking to the HTTP endpoint named by `config`.
    pub fn new(config: &ChatConfig) -> Result<Self> {
        let client = ReplyClient::with_options(config.endpoint.clone(), config.timeout)?;
        Ok(Self::with_endpoint(client, config.greeting.clone()))
    }
}

impl<E: ReplyEndpoint> ChatSession<E> {
    /// Creates a session with a custom endpoint and an optional greeting.
    pub fn with_endpoint(endpoint: E, greeting: Option<String>) -> Self {
        let mut transcript = Transcript::new();
        if let Some(greeting) = greeting {
            transcript.push(Sender::Assistant, greeting);
        }
        Self {
            endpoint,
            transcript,
            draft: String::new(),
            pending_id: None,
            request_count: 0,
            answered_count: 0,
            empty_count: 0,
            failed_count: 0,
            rejected_count: 0,
        }
    }

    /// Replaces the draft text.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Returns the current draft.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Returns true while a request is outstanding.
    pub fn is_awaiting_reply(&self) -> bool {
        self.pending_id.is_some()
    }

    /// Returns true if [`submit`](Self::submit) would currently be accepted.
    pub fn can_submit(&self) -> bool {
        !self.is_awaiting_reply() && !self.draft.trim().is_empty()
    }

    /// Returns the transcript in insertion order.
    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Returns the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.transcript.messages().len()
    }

    /// Returns the endpoint replies are requested from.
    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Accepts the draft and opens a request cycle.
    ///
    /// On success the user message is already in the transcript, the draft is
    /// empty and the session is awaiting a reply.  The caller must hand the
    /// returned ticket back to [`complete`](Self::complete).
    ///
    /// # Errors
    ///
    /// Returns the rejection reason, having changed nothing, when the draft is
    /// blank or a reply is already pending.
    pub fn begin_submit(&mut self) -> std::result::Result<PendingReply, Rejection> {
        let rejection = if self.is_awaiting_reply() {
            Some(Rejection::AwaitingReply)
        } else if self.draft.trim().is_empty() {
            Some(Rejection::EmptyDraft)
        } else {
            None
        };
        if let Some(rejection) = rejection {
            CHAT_REJECTED.click();
            self.rejected_count = self.rejected_count.saturating_add(1);
            tracing::debug!(?rejection, "submit rejected");
            return Err(rejection);
        }

        CHAT_SUBMITS.click();
        let text = std::mem::take(&mut self.draft);
        let message_id = self.transcript.push(Sender::User, text.clone()).id.clone();
        self.pending_id = Some(message_id.clone());
        self.request_count = self.request_count.saturating_add(1);
        Ok(PendingReply { message_id, text })
    }

    /// Closes a request cycle with the endpoint's result.
    ///
    /// Appends exactly one assistant message and clears the awaiting flag.
    ///
    /// # Panics
    ///
    /// Panics if `pending` is not the ticket this session handed out last,
    /// including when no request is outstanding.
    pub fn complete(
        &mut self,
        pending: PendingReply,
        result: Result<Option<String>>,
    ) -> ReplyKind {
        assert_eq!(
            self.pending_id.as_ref(),
            Some(pending.message_id()),
            "completed a reply this session is not awaiting"
        );
        let (kind, text) = match result {
            Ok(Some(reply)) => (ReplyKind::Answered, reply),
            Ok(None) => (ReplyKind::Empty, APOLOGY_TEXT.to_string()),
            Err(err) => {
                tracing::debug!(error = %err, "substituting fallback reply");
                (ReplyKind::Failed, NETWORK_ERROR_TEXT.to_string())
            }
        };
        match kind {
            ReplyKind::Answered => self.answered_count = self.answered_count.saturating_add(1),
            ReplyKind::Empty => self.empty_count = self.empty_count.saturating_add(1),
            ReplyKind::Failed => self.failed_count = self.failed_count.saturating_add(1),
        }

        self.transcript.push(Sender::Assistant, text);
        self.pending_id = None;
        tracing::debug!(reply_to = %pending.message_id(), ?kind, "request cycle complete");
        kind
    }

    /// Sends the draft and waits for the reply.
    ///
    /// This method:
    /// 1. Refuses a blank draft or a second concurrent send
    /// 2. Adds the user message to the transcript and renders it
    /// 3. Shows the typing indicator while the request is outstanding
    /// 4. Adds and renders the reply, or a fallback text if there is none
    ///
    /// Request failures never surface as errors here; they become the
    /// network-error fallback message.
    pub async fn submit(&mut self, renderer: &mut dyn Renderer) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(rejection) => return SubmitOutcome::Rejected(rejection),
        };
        if let Some(message) = self.transcript.last() {
            renderer.print_message(message);
        }

        renderer.start_typing();
        let result = self.endpoint.request_reply(pending.text()).await;
        renderer.finish_typing();

        let kind = self.complete(pending, result);
        if let Some(message) = self.transcript.last() {
            renderer.print_message(message);
        }
        SubmitOutcome::Completed(kind)
    }

    /// Replaces the draft with `text` and submits it.
    pub async fn send(
        &mut self,
        text: impl Into<String>,
        renderer: &mut dyn Renderer,
    ) -> SubmitOutcome {
        self.update_draft(text);
        self.submit(renderer).await
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            endpoint: self.endpoint.describe(),
            message_count: self.message_count(),
            awaiting_reply: self.is_awaiting_reply(),
            total_requests: self.request_count,
            answered: self.answered_count,
            empty_replies: self.empty_count,
            failures: self.failed_count,
            rejected_submits: self.rejected_count,
        }
    }
}
