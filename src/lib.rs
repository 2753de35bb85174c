// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod message;
pub mod observability;
pub mod render;
pub mod utils;

// Re-exports
pub use client::{ReplyClient, ReplyEndpoint};
pub use error::{Error, Result};
pub use message::{Message, MessageId, Sender, Transcript};
pub use observability::register_biometrics;
pub use render::{PlainTextRenderer, Renderer};
