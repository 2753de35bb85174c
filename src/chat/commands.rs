//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to inspect the chat session without sending messages
//! to the endpoint.

/// A parsed chat command.
///
/// These commands control the REPL and are never sent to the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Re-render the whole transcript.
    History,

    /// Show session statistics.
    Stats,

    /// Show the current configuration.
    ShowConfig,

    /// Show the current draft.
    Draft,

    /// Show available commands.
    Help,

    /// Exit the application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be treated as a regular message.
///
/// # Examples
///
/// ```
/// # use parley::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/history").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    let rest = input.strip_prefix('/')?;
    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "history" => no_argument(ChatCommand::History, argument, "/history"),
        "stats" | "status" => no_argument(ChatCommand::Stats, argument, "/stats"),
        "config" => no_argument(ChatCommand::ShowConfig, argument, "/config"),
        "draft" => no_argument(ChatCommand::Draft, argument, "/draft"),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        "clear" => ChatCommand::Invalid("The transcript cannot be cleared".to_string()),
        "" => ChatCommand::Invalid("Empty command; type /help for commands".to_string()),
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

fn no_argument(command: ChatCommand, argument: Option<&str>, name: &str) -> ChatCommand {
    match argument {
        Some(_) => ChatCommand::Invalid(format!("{name} takes no arguments")),
        None => command,
    }
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /history               Show the whole conversation
  /stats                 Show session statistics
  /config                Show current configuration
  /draft                 Show the unsent draft
  /help                  Show this help message
  /quit                  Exit the chat
Anything else is sent to the assistant."#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_commands() {
        assert_eq!(parse_command("/quit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("  /quit  "), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_inspection_commands() {
        assert_eq!(parse_command("/history"), Some(ChatCommand::History));
        assert_eq!(parse_command("/HISTORY"), Some(ChatCommand::History));
        assert_eq!(parse_command("/stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/status"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/config"), Some(ChatCommand::ShowConfig));
        assert_eq!(parse_command("/draft"), Some(ChatCommand::Draft));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn arguments_are_rejected() {
        assert!(matches!(
            parse_command("/stats now"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("no arguments")
        ));
    }

    #[test]
    fn clear_is_not_supported() {
        assert!(matches!(
            parse_command("/clear"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("cannot be cleared")
        ));
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(
            parse_command("/model gpt"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
        assert!(matches!(parse_command("/"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello there!"), None);
        assert_eq!(parse_command("what is 1/2?"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn help_text_not_empty() {
        let help = help_text();
        assert!(help.contains("/quit"));
        assert!(help.contains("/history"));
        assert!(help.contains("/stats"));
    }
}
