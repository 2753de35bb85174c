//! Output rendering for the chat transcript.
//!
//! This module provides a trait-based rendering abstraction so that the
//! session can drive different surfaces.  The default implementation writes
//! to the terminal, using ANSI escape codes to tell senders apart.

use std::io::{self, Stdout, Write};

use crate::message::Message;
use crate::utils::time::format_clock;

/// ANSI escape code for dim text (used for timestamps and the typing indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for sender labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for yellow text (used for user messages).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for magenta text (used for assistant messages).
const ANSI_MAGENTA: &str = "\x1b[35m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Moves to column 0 and erases the current line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Text shown while a reply is awaited.
pub const TYPING_INDICATOR: &str = "Assistant is typing...";

/// Input prompt; it reads like the label on the user's own messages.
pub const PROMPT: &str = "You: ";

/// Trait for rendering chat output.
///
/// This abstraction allows for different rendering strategies:
/// - Plain text with ANSI styling
/// - Plain text without styling (for piping/redirecting)
/// - Recording renderers in tests
pub trait Renderer: Send {
    /// Print one transcript entry.
    fn print_message(&mut self, message: &Message);

    /// Show the typing indicator.
    ///
    /// Called right after the user message has been shown and the request
    /// has been issued.
    fn start_typing(&mut self);

    /// Remove the typing indicator.
    ///
    /// Called once the request has settled, before the reply is printed.
    fn finish_typing(&mut self);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);

    /// Print a sequence of transcript entries.
    fn print_transcript(&mut self, messages: &[Message]) {
        for message in messages {
            self.print_message(message);
        }
    }
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    typing: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            typing: false,
        }
    }

    /// Returns true if ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn clear_typing(&mut self) {
        if self.typing {
            if self.use_color {
                print!("{ANSI_CLEAR_LINE}");
            } else {
                println!();
            }
            self.typing = false;
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_message(&mut self, message: &Message) {
        self.clear_typing();
        println!("{}", format_message(message, self.use_color));
        self.flush();
    }

    fn start_typing(&mut self) {
        if self.typing {
            return;
        }
        if self.use_color {
            print!("{ANSI_DIM}{TYPING_INDICATOR}{ANSI_RESET}");
        } else {
            print!("{TYPING_INDICATOR}");
        }
        self.typing = true;
        self.flush();
    }

    fn finish_typing(&mut self) {
        self.clear_typing();
        self.flush();
    }

    fn print_error(&mut self, error: &str) {
        self.clear_typing();
        if self.use_color {
            eprintln!("{ANSI_RED}Error: {error}{ANSI_RESET}");
        } else {
            eprintln!("Error: {error}");
        }
    }

    fn print_info(&mut self, info: &str) {
        self.clear_typing();
        println!("{info}");
        self.flush();
    }
}

/// Formats a message as a single transcript line.
///
/// Continuation lines of multi-line messages are indented under the text.
pub fn format_message(message: &Message, use_color: bool) -> String {
    let clock = format_clock(&message.timestamp);
    let label = message.sender.label();
    let indent = " ".repeat(clock.len() + label.len() + 5);
    let text = message.text.replace('\n', &format!("\n{indent}"));

    if use_color {
        let color = if message.is_user() {
            ANSI_YELLOW
        } else {
            ANSI_MAGENTA
        };
        format!(
            "{ANSI_DIM}[{clock}]{ANSI_RESET} {ANSI_BOLD}{color}{label}:{ANSI_RESET} \
             {color}{text}{ANSI_RESET}"
        )
    } else {
        format!("[{clock}] {label}: {text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageId, Sender};
    use time::macros::datetime;

    fn message(sender: Sender, text: &str) -> Message {
        Message {
            id: MessageId::generate(),
            text: text.to_string(),
            sender,
            timestamp: datetime!(2024-05-01 14:07:00 UTC),
        }
    }

    #[test]
    fn renderer_default_has_color() {
        let renderer = PlainTextRenderer::new();
        assert!(renderer.use_color());
    }

    #[test]
    fn renderer_without_color() {
        let renderer = PlainTextRenderer::with_color(false);
        assert!(!renderer.use_color());
    }

    #[test]
    fn plain_lines_name_the_sender() {
        assert_eq!(
            format_message(&message(Sender::User, "hi there"), false),
            "[14:07] You: hi there"
        );
        assert_eq!(
            format_message(&message(Sender::Assistant, "hello"), false),
            "[14:07] Assistant: hello"
        );
    }

    #[test]
    fn senders_get_distinct_colors() {
        let user = format_message(&message(Sender::User, "x"), true);
        let assistant = format_message(&message(Sender::Assistant, "x"), true);
        assert!(user.contains(ANSI_YELLOW));
        assert!(!user.contains(ANSI_MAGENTA));
        assert!(assistant.contains(ANSI_MAGENTA));
        assert!(!assistant.contains(ANSI_YELLOW));
    }

    #[test]
    fn prompt_uses_the_user_label() {
        assert_eq!(PROMPT, format!("{}: ", Sender::User.label()));
    }

    #[test]
    fn multiline_text_is_indented() {
        let line = format_message(&message(Sender::User, "one\ntwo"), false);
        assert_eq!(line, "[14:07] You: one\n             two");
    }
}
