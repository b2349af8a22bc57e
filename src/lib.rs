//! Chat session controller that relays user turns to a `POST /chat` endpoint.
//!
//! A [`ChatController`](chat::ChatController) owns the display list and the
//! input state of one conversation.  It shows each user message, stands a
//! typing placeholder in while the single outstanding request runs, and then
//! appends either the server's reply or a fixed fallback message.

// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod observability;
pub mod types;

// Re-exports
pub use client::{ChatClient, ChatTransport};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
