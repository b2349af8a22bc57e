use crate::types::Message;

/// The transient "awaiting reply" marker shown while a request is outstanding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingPlaceholder {
    /// Text shown in place of the reply, e.g. `Amanda is typing...`.
    pub label: String,
}

impl TypingPlaceholder {
    /// Creates the placeholder shown while `bot_name` composes a reply.
    pub fn for_bot(bot_name: &str) -> Self {
        Self {
            label: format!("{bot_name} is typing..."),
        }
    }
}

/// One row of the chat display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEntry {
    /// A permanent message.
    Message(Message),

    /// The typing placeholder.  At most one is present at a time.
    Typing(TypingPlaceholder),
}

impl DisplayEntry {
    /// Returns the message, if this entry is one.
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            DisplayEntry::Message(message) => Some(message),
            DisplayEntry::Typing(_) => None,
        }
    }

    /// Returns true for the typing placeholder.
    pub fn is_typing(&self) -> bool {
        matches!(self, DisplayEntry::Typing(_))
    }
}

impl From<Message> for DisplayEntry {
    fn from(message: Message) -> Self {
        DisplayEntry::Message(message)
    }
}
