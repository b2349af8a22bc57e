//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::time::Duration;

use arrrg_derive::CommandLine;

/// Name shown for the bot when none is configured.
pub const DEFAULT_BOT_NAME: &str = "Amanda";

/// Command-line arguments for the chatrelay tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Base URL of the chat server.
    #[arrrg(optional, "Chat server base URL (default: $CHATRELAY_URL or http://127.0.0.1:5000/)", "URL")]
    pub url: Option<String>,

    /// Name shown for the bot's replies.
    #[arrrg(optional, "Name shown for bot replies (default: Amanda)", "NAME")]
    pub bot_name: Option<String>,

    /// Message the bot greets the user with when the session starts.
    #[arrrg(optional, "Greeting shown when the session starts", "TEXT")]
    pub greeting: Option<String>,

    /// Request timeout in seconds.
    #[arrrg(optional, "Request timeout in seconds (default: none)", "SECONDS")]
    pub timeout_secs: Option<u64>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Base URL of the chat server; `None` defers to the client's default.
    pub base_url: Option<String>,

    /// Name shown for bot replies and in the typing placeholder.
    pub bot_name: String,

    /// Optional greeting appended as a bot message when the session attaches.
    pub greeting: Option<String>,

    /// Optional request timeout.  `None` waits for the transport indefinitely.
    pub timeout: Option<Duration>,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Base URL: client default
    /// - Bot name: Amanda
    /// - Greeting: none
    /// - Timeout: none
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            base_url: None,
            bot_name: DEFAULT_BOT_NAME.to_string(),
            greeting: None,
            timeout: None,
            use_color: true,
        }
    }

    /// Sets the chat server base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the bot name.
    pub fn with_bot_name(mut self, name: impl Into<String>) -> Self {
        self.bot_name = name.into();
        self
    }

    /// Sets the greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
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
        let base_url = args.url.filter(|url| !url.trim().is_empty());
        let bot_name = args
            .bot_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string());

        ChatConfig {
            base_url,
            bot_name,
            greeting: args.greeting,
            timeout: args.timeout_secs.map(Duration::from_secs),
            use_color: !args.no_color,
        }
    }
}
