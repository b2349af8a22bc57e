//! The display surface a chat controller drives.
//!
//! A [`ChatView`] stands in for the three UI handles a chat page needs: the
//! message list, the text input and the send control.  The controller owns
//! the display state and tells the view what changed; the view only draws.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{Message, TypingPlaceholder};

/// Trait for the UI handles a chat session renders into.
///
/// Implementations:
/// - [`TerminalView`](crate::chat::TerminalView) for interactive terminals
/// - [`RecordingView`] for tests and embedders that render elsewhere
pub trait ChatView: Send {
    /// Append a message at the end of the message list.
    fn append_message(&mut self, message: &Message);

    /// Insert the typing placeholder at the end of the message list.
    fn show_typing(&mut self, placeholder: &TypingPlaceholder);

    /// Remove the typing placeholder.
    ///
    /// Only called while a placeholder is shown.
    fn remove_typing(&mut self);

    /// Clear whatever is typed into the input field.
    fn clear_input(&mut self);

    /// Enable or disable both the input field and the send control.
    fn set_controls_enabled(&mut self, enabled: bool);

    /// Give keyboard focus to the input field.
    fn focus_input(&mut self);

    /// Scroll the message list so the newest entry is visible.
    fn scroll_to_end(&mut self) {}
}

/// One call made against a [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// `append_message`
    Appended(Message),
    /// `show_typing`
    TypingShown(String),
    /// `remove_typing`
    TypingRemoved,
    /// `clear_input`
    InputCleared,
    /// `set_controls_enabled`
    ControlsEnabled(bool),
    /// `focus_input`
    InputFocused,
    /// `scroll_to_end`
    Scrolled,
    /// A marker pushed by something other than the controller, e.g. a
    /// transport noting that a request went out.
    Note(String),
}

/// A view that records every call it receives.
///
/// Clones share the same journal, so a test can hand one clone to the
/// controller and keep another to inspect (or to let a fake transport note
/// when it was called relative to the display updates).
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    journal: Arc<Mutex<Journal>>,
}

#[derive(Debug, Default)]
struct Journal {
    events: Vec<ViewEvent>,
    controls_enabled: bool,
    input_focused: bool,
}

impl RecordingView {
    /// Creates an empty recording view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every event recorded so far.
    pub fn events(&self) -> Vec<ViewEvent> {
        self.lock().events.clone()
    }

    /// Push a marker into the journal.
    pub fn note(&self, note: impl Into<String>) {
        self.lock().events.push(ViewEvent::Note(note.into()));
    }

    /// Whether the input and send control are currently enabled.
    pub fn controls_enabled(&self) -> bool {
        self.lock().controls_enabled
    }

    /// Whether the input field currently has focus.
    pub fn input_focused(&self) -> bool {
        self.lock().input_focused
    }

    /// Number of events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&ViewEvent) -> bool) -> usize {
        self.lock().events.iter().filter(|e| predicate(e)).count()
    }

    fn lock(&self) -> MutexGuard<'_, Journal> {
        // A panicking test thread may poison the lock; the journal is still usable.
        self.journal
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, event: ViewEvent) {
        self.lock().events.push(event);
    }
}

impl ChatView for RecordingView {
    fn append_message(&mut self, message: &Message) {
        self.record(ViewEvent::Appended(message.clone()));
    }

    fn show_typing(&mut self, placeholder: &TypingPlaceholder) {
        self.record(ViewEvent::TypingShown(placeholder.label.clone()));
    }

    fn remove_typing(&mut self) {
        self.record(ViewEvent::TypingRemoved);
    }

    fn clear_input(&mut self) {
        self.record(ViewEvent::InputCleared);
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        let mut journal = self.lock();
        journal.controls_enabled = enabled;
        if !enabled {
            journal.input_focused = false;
        }
        journal.events.push(ViewEvent::ControlsEnabled(enabled));
    }

    fn focus_input(&mut self) {
        let mut journal = self.lock();
        journal.input_focused = true;
        journal.events.push(ViewEvent::InputFocused);
    }

    fn scroll_to_end(&mut self) {
        self.record(ViewEvent::Scrolled);
    }
}
