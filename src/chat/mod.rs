//! Chat session module: one controller per conversation.
//!
//! This module provides everything between the user's keystrokes and the
//! `/chat` endpoint:
//!
//! - Turn handling with a typing placeholder and a fixed fallback reply
//! - A view abstraction over the message list, input field and send control
//! - A terminal view that renders replies as plain text
//! - Slash commands for the REPL
//!
//! # Architecture
//!
//! - [`controller`]: the chat session controller and its turn lifecycle
//! - [`view`]: the [`ChatView`] trait and a recording implementation
//! - [`render`]: terminal rendering
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: slash command parsing

pub mod commands;
pub mod config;
pub mod controller;
pub mod render;
pub mod view;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_BOT_NAME};
pub use controller::{ChatController, FALLBACK_REPLY, SessionStats, SubmitOutcome};
pub use render::{TerminalView, plain_text};
pub use view::{ChatView, RecordingView, ViewEvent};
