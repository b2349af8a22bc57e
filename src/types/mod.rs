// Public modules
pub mod chat_reply;
pub mod chat_request;
pub mod display_entry;
pub mod message;

// Re-exports
pub use chat_reply::ChatReply;
pub use chat_request::ChatRequest;
pub use display_entry::{DisplayEntry, TypingPlaceholder};
pub use message::{Message, Sender};
