//! Chat application module for conversations with a reply endpoint.
//!
//! This module provides a REPL-friendly chat session built on top of the
//! parley client library. It supports:
//!
//! - One outstanding request at a time, gated by an awaiting-reply flag
//! - Fallback assistant messages when no reply is available
//! - Slash commands for inspecting the session
//!
//! # Architecture
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`session`]: Core chat session management and endpoint interaction
//! - [`commands`]: Slash command parsing and handling

mod commands;
mod config;
mod session;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_GREETING};
pub use session::{
    APOLOGY_TEXT, ChatSession, NETWORK_ERROR_TEXT, PendingReply, Rejection, ReplyKind,
    SessionStats, SubmitOutcome,
};
