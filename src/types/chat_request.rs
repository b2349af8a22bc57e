use serde::{Deserialize, Serialize};

/// Body of a `POST /chat` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    /// The trimmed text the user submitted.
    pub message: String,
}

impl ChatRequest {
    /// Creates a new request carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
