use std::fmt;

use serde::{Deserialize, Serialize};

/// Who authored a message in the chat display.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the input field.
    User,

    /// The remote chat endpoint.
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

/// A single entry in the chat display.
///
/// Messages are created on send or receive and appended to the display list.
/// They are never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// The text shown for this message.
    pub text: String,

    /// The author of the message.
    pub sender: Sender,
}

impl Message {
    /// Create a new `Message`.
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            text: text.into(),
            sender,
        }
    }

    /// Create a new user `Message`.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Sender::User)
    }

    /// Create a new bot `Message`.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Sender::Bot)
    }

    /// Returns true if the user authored this message.
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Returns true if the bot authored this message.
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:?}", self.sender, self.text)
    }
}
