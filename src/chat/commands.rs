//! Slash command parsing for the chat application.
//!
//! Lines starting with `/` control the REPL and are never sent to the chat
//! endpoint.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Display help information.
    Help,

    /// Re-print every message in the conversation.
    History,

    /// Display session statistics.
    Stats,

    /// Exit the chat application.
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
/// # use chatrelay::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("What are the admission requirements?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "help" | "?" => ChatCommand::Help,
        "history" => ChatCommand::History,
        "stats" | "status" => ChatCommand::Stats,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    if let Some(argument) = argument
        && !matches!(result, ChatCommand::Invalid(_))
    {
        return Some(ChatCommand::Invalid(format!(
            "/{command} takes no arguments (got {argument:?})"
        )));
    }

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /history               Show the conversation so far
  /stats                 Show session statistics
  /help                  Show this help message
  /quit                  Exit the chat"#
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
    fn parse_case_insensitive() {
        assert_eq!(parse_command("/HISTORY"), Some(ChatCommand::History));
        assert_eq!(parse_command("/Stats"), Some(ChatCommand::Stats));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn unknown_command() {
        assert_eq!(
            parse_command("/model gpt"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
    }

    #[test]
    fn arguments_rejected() {
        assert!(matches!(
            parse_command("/stats now"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("takes no arguments")
        ));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello, Amanda!"), None);
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
