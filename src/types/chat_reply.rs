use serde::{Deserialize, Serialize};

/// Body of a successful `POST /chat` response.
///
/// Only the `response` field is read; anything else the server sends is
/// ignored.  A body without a string `response` fails to deserialize and the
/// turn is treated as failed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatReply {
    /// The bot's reply text.
    pub response: String,
}

impl ChatReply {
    /// Creates a new reply.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}
