//! Core chat session management.
//!
//! This module provides the [`ChatController`], which owns the chat display,
//! the input state and the send action.  Each accepted submission is one
//! turn: the user's message is shown, a typing placeholder stands in while
//! the transport is outstanding, and exactly one bot message (the reply or
//! the fallback) replaces it.

use std::time::Instant;

use crate::chat::config::ChatConfig;
use crate::chat::view::ChatView;
use crate::client::ChatTransport;
use crate::error::Error;
use crate::observability::{
    SESSION_FALLBACKS, SESSION_IGNORED_INPUTS, SESSION_REPLIES, SESSION_TURN_DURATION,
    SESSION_TURNS,
};
use crate::types::{ChatRequest, DisplayEntry, Message, TypingPlaceholder};

/// The bot message shown for every failed turn, whatever the cause.
pub const FALLBACK_REPLY: &str =
    "I'm sorry, I'm having trouble connecting or processing your request. Please try again later.";

/// What a call to [`ChatController::submit`] did.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The text was empty after trimming; nothing happened.
    Ignored,

    /// A turn was already awaiting its reply; nothing happened.
    Busy,

    /// The server replied and the reply was appended.
    Replied,

    /// The turn failed and the fallback message was appended.  The error is
    /// returned for diagnostics only.
    Failed(Error),
}

impl SubmitOutcome {
    /// Returns true if the submission produced a turn.
    pub fn is_turn(&self) -> bool {
        matches!(self, SubmitOutcome::Replied | SubmitOutcome::Failed(_))
    }
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of messages on display, the greeting included.
    pub message_count: usize,
    /// Turns started (non-empty submissions).
    pub turns: u64,
    /// Turns that ended with a server reply.
    pub replies: u64,
    /// Turns that ended with the fallback message.
    pub failures: u64,
    /// Submissions ignored because they were empty or arrived while busy.
    pub ignored: u64,
}

/// Display state shared between the controller and a turn in flight.
struct Display<V: ChatView> {
    view: V,
    entries: Vec<DisplayEntry>,
    awaiting_reply: bool,
}

impl<V: ChatView> Display<V> {
    fn append(&mut self, message: Message) {
        self.view.append_message(&message);
        self.view.scroll_to_end();
        self.entries.push(DisplayEntry::Message(message));
    }

    fn show_typing(&mut self, placeholder: TypingPlaceholder) {
        self.view.show_typing(&placeholder);
        self.view.scroll_to_end();
        self.entries.push(DisplayEntry::Typing(placeholder));
    }

    fn remove_typing(&mut self) {
        if let Some(index) = self.entries.iter().rposition(DisplayEntry::is_typing) {
            self.entries.remove(index);
            self.view.remove_typing();
        }
    }

    fn set_awaiting(&mut self, awaiting: bool) {
        self.awaiting_reply = awaiting;
        self.view.set_controls_enabled(!awaiting);
        if !awaiting {
            self.view.focus_input();
        }
    }
}

/// A turn that has shown its placeholder and disabled the controls.
///
/// Dropping it, whether after [`PendingTurn::finish`] or because the submit
/// future was abandoned mid-request, removes the placeholder and hands the
/// controls back to the user.
struct PendingTurn<'a, V: ChatView> {
    display: &'a mut Display<V>,
}

impl<'a, V: ChatView> PendingTurn<'a, V> {
    fn begin(display: &'a mut Display<V>, text: &str, placeholder: TypingPlaceholder) -> Self {
        display.append(Message::user(text));
        display.view.clear_input();
        display.set_awaiting(true);
        display.show_typing(placeholder);
        Self { display }
    }

    fn finish(self, reply: Message) {
        self.display.remove_typing();
        self.display.append(reply);
    }
}

impl<V: ChatView> Drop for PendingTurn<'_, V> {
    fn drop(&mut self) {
        self.display.remove_typing();
        self.display.set_awaiting(false);
    }
}

/// A chat session bound to one transport and one view.
///
/// All state is owned here, so independent sessions can coexist.
pub struct ChatController<T: ChatTransport, V: ChatView> {
    transport: T,
    display: Display<V>,
    config: ChatConfig,
    stats: SessionStats,
}

impl<T: ChatTransport, V: ChatView> ChatController<T, V> {
    /// Attaches a new session to `view` once the UI handles exist.
    ///
    /// The controls are enabled and focused, and the configured greeting, if
    /// any, is shown as the first bot message.
    pub fn attach(transport: T, view: V, config: ChatConfig) -> Self {
        let mut display = Display {
            view,
            entries: Vec::new(),
            awaiting_reply: false,
        };
        if let Some(greeting) = config.greeting.as_deref() {
            display.append(Message::bot(greeting));
        }
        display.set_awaiting(false);
        tracing::debug!(bot = %config.bot_name, "chat session attached");
        Self {
            transport,
            display,
            config,
            stats: SessionStats::default(),
        }
    }

    /// Submits the user's text as one turn.
    ///
    /// Whitespace-only text and submissions made while a reply is pending
    /// are ignored.  Otherwise the trimmed text is appended as a user message,
    /// the input is cleared and disabled, the typing placeholder is shown and
    /// a single request goes to the transport.  The placeholder is then
    /// replaced by the reply or, on any failure, by [`FALLBACK_REPLY`].  The
    /// controls are re-enabled and focused in every case.
    ///
    /// Failures never escape as errors; the cause is logged and returned in
    /// [`SubmitOutcome::Failed`].
    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            SESSION_IGNORED_INPUTS.click();
            self.stats.ignored += 1;
            return SubmitOutcome::Ignored;
        }
        if self.display.awaiting_reply {
            SESSION_IGNORED_INPUTS.click();
            self.stats.ignored += 1;
            return SubmitOutcome::Busy;
        }

        SESSION_TURNS.click();
        self.stats.turns += 1;
        let start = Instant::now();
        let request = ChatRequest::new(text);
        let placeholder = TypingPlaceholder::for_bot(&self.config.bot_name);

        let turn = PendingTurn::begin(&mut self.display, text, placeholder);
        let result = self.transport.send(&request).await;
        let outcome = match result {
            Ok(reply) => {
                turn.finish(Message::bot(reply.response));
                SESSION_REPLIES.click();
                self.stats.replies += 1;
                SubmitOutcome::Replied
            }
            Err(err) => {
                // Settle the display first; the log may share its terminal.
                turn.finish(Message::bot(FALLBACK_REPLY));
                tracing::error!(error = %err, "chat turn failed; showed fallback reply");
                SESSION_FALLBACKS.click();
                self.stats.failures += 1;
                SubmitOutcome::Failed(err)
            }
        };
        SESSION_TURN_DURATION.add(start.elapsed().as_secs_f64());
        outcome
    }

    /// Returns true exactly while a request is outstanding.
    pub fn is_awaiting_reply(&self) -> bool {
        self.display.awaiting_reply
    }

    /// The permanent messages on display, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.display
            .entries
            .iter()
            .filter_map(DisplayEntry::as_message)
    }

    /// Every display entry, including the typing placeholder if shown.
    pub fn entries(&self) -> &[DisplayEntry] {
        &self.display.entries
    }

    /// Returns the number of messages on display.
    pub fn message_count(&self) -> usize {
        self.messages().count()
    }

    /// Returns the session's configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Returns the view.
    pub fn view(&self) -> &V {
        &self.display.view
    }

    /// Returns the view for direct output outside the message list.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.display.view
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            message_count: self.message_count(),
            ..self.stats.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::chat::view::{RecordingView, ViewEvent};
    use crate::error::Result;
    use crate::types::ChatReply;

    /// Replays canned results and notes each call in the view's journal.
    struct ScriptedTransport {
        view: RecordingView,
        script: Mutex<Vec<Result<ChatReply>>>,
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        fn new(view: &RecordingView, script: Vec<Result<ChatReply>>) -> Self {
            Self {
                view: view.clone(),
                script: Mutex::new(script.into_iter().rev().collect()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, request: &ChatRequest) -> Result<ChatReply> {
            self.view.note(format!("sent {}", request.message));
            self.requests.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(Error::connection("script exhausted", None)))
        }
    }

    /// Never resolves, so the submit future can be dropped mid-request.
    struct StalledTransport;

    #[async_trait::async_trait]
    impl ChatTransport for StalledTransport {
        async fn send(&self, _: &ChatRequest) -> Result<ChatReply> {
            std::future::pending().await
        }
    }

    fn session(
        script: Vec<Result<ChatReply>>,
    ) -> (
        ChatController<ScriptedTransport, RecordingView>,
        RecordingView,
    ) {
        let view = RecordingView::new();
        let transport = ScriptedTransport::new(&view, script);
        let controller = ChatController::attach(transport, view.clone(), ChatConfig::new());
        (controller, view)
    }

    fn transcript<T: ChatTransport, V: ChatView>(controller: &ChatController<T, V>) -> Vec<Message> {
        controller.messages().cloned().collect()
    }

    #[test]
    fn attach_enables_and_focuses() {
        let (controller, view) = session(vec![]);
        assert!(!controller.is_awaiting_reply());
        assert!(view.controls_enabled());
        assert!(view.input_focused());
        assert_eq!(controller.message_count(), 0);
    }

    #[test]
    fn attach_shows_greeting() {
        let view = RecordingView::new();
        let transport = ScriptedTransport::new(&view, vec![]);
        let config = ChatConfig::new().with_greeting("Hello! I am Amanda.");
        let controller = ChatController::attach(transport, view.clone(), config);
        assert_eq!(transcript(&controller), vec![Message::bot("Hello! I am Amanda.")]);
        assert!(controller.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn whitespace_is_ignored() {
        let (mut controller, view) = session(vec![]);
        let before = view.events();

        let outcome = controller.submit("   \t\n").await;
        assert!(matches!(outcome, SubmitOutcome::Ignored));
        assert_eq!(view.events(), before);
        assert!(controller.transport.requests().is_empty());
        assert_eq!(controller.stats().ignored, 1);
        assert_eq!(controller.stats().turns, 0);
    }

    #[tokio::test]
    async fn reply_is_appended() {
        let (mut controller, view) = session(vec![Ok(ChatReply::new("Hi there!"))]);

        let outcome = controller.submit("  Hello ").await;
        assert!(matches!(outcome, SubmitOutcome::Replied));
        assert_eq!(
            transcript(&controller),
            vec![Message::user("Hello"), Message::bot("Hi there!")]
        );
        assert!(controller.entries().iter().all(|e| !e.is_typing()));
        assert_eq!(controller.transport.requests(), vec![ChatRequest::new("Hello")]);
        assert!(!controller.is_awaiting_reply());
        assert!(view.controls_enabled());
        assert!(view.input_focused());
    }

    #[tokio::test]
    async fn turn_happens_in_order() {
        let (mut controller, view) = session(vec![Ok(ChatReply::new("Hi there!"))]);
        let attach_events = view.events().len();

        controller.submit("Hello").await;
        let events = view.events().split_off(attach_events);
        assert_eq!(
            events,
            vec![
                ViewEvent::Appended(Message::user("Hello")),
                ViewEvent::Scrolled,
                ViewEvent::InputCleared,
                ViewEvent::ControlsEnabled(false),
                ViewEvent::TypingShown("Amanda is typing...".to_string()),
                ViewEvent::Scrolled,
                ViewEvent::Note("sent Hello".to_string()),
                ViewEvent::TypingRemoved,
                ViewEvent::Appended(Message::bot("Hi there!")),
                ViewEvent::Scrolled,
                ViewEvent::ControlsEnabled(true),
                ViewEvent::InputFocused,
            ]
        );
    }

    #[tokio::test]
    async fn failure_shows_fallback() {
        let (mut controller, view) =
            session(vec![Err(Error::internal_server("Error: Chatbot is not ready."))]);

        let outcome = controller.submit("Hello").await;
        match outcome {
            SubmitOutcome::Failed(err) => assert_eq!(err.status_code(), Some(500)),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(
            transcript(&controller),
            vec![Message::user("Hello"), Message::bot(FALLBACK_REPLY)]
        );
        assert!(controller.entries().iter().all(|e| !e.is_typing()));
        assert!(view.controls_enabled());
        assert_eq!(controller.stats().failures, 1);
    }

    #[tokio::test]
    async fn error_details_are_not_shown() {
        let (mut controller, view) =
            session(vec![Err(Error::serialization("missing field `response`", None))]);

        controller.submit("Hello").await;
        let shown = view.count(|e| {
            matches!(e, ViewEvent::Appended(m) if m.text.contains("missing field"))
        });
        assert_eq!(shown, 0);
    }

    #[tokio::test]
    async fn one_placeholder_per_turn() {
        let (mut controller, view) = session(vec![
            Ok(ChatReply::new("first")),
            Err(Error::connection("refused", None)),
        ]);

        controller.submit("A").await;
        controller.submit("B").await;
        controller.submit(" ").await;

        assert_eq!(view.count(|e| matches!(e, ViewEvent::TypingShown(_))), 2);
        assert_eq!(view.count(|e| matches!(e, ViewEvent::TypingRemoved)), 2);
        assert_eq!(
            transcript(&controller),
            vec![
                Message::user("A"),
                Message::bot("first"),
                Message::user("B"),
                Message::bot(FALLBACK_REPLY),
            ]
        );
        assert_eq!(
            controller.stats(),
            SessionStats {
                message_count: 4,
                turns: 2,
                replies: 1,
                failures: 1,
                ignored: 1,
            }
        );
    }

    #[tokio::test]
    async fn busy_session_rejects_submissions() {
        let (mut controller, view) = session(vec![Ok(ChatReply::new("late"))]);
        controller.display.awaiting_reply = true;
        let before = view.events();

        let outcome = controller.submit("Hello").await;
        assert!(matches!(outcome, SubmitOutcome::Busy));
        assert_eq!(view.events(), before);
        assert!(controller.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn abandoned_turn_cleans_up() {
        let view = RecordingView::new();
        let mut controller =
            ChatController::attach(StalledTransport, view.clone(), ChatConfig::new());

        {
            let submit = controller.submit("Hello");
            tokio::pin!(submit);
            let polled = poll_once(submit.as_mut()).await;
            assert!(polled.is_none());
            assert!(!view.controls_enabled());
            assert_eq!(view.count(|e| matches!(e, ViewEvent::TypingShown(_))), 1);
            assert_eq!(view.count(|e| matches!(e, ViewEvent::TypingRemoved)), 0);
        }

        assert!(!controller.is_awaiting_reply());
        assert!(controller.entries().iter().all(|e| !e.is_typing()));
        assert_eq!(transcript(&controller), vec![Message::user("Hello")]);
        assert!(view.controls_enabled());
        assert!(view.input_focused());
    }

    #[test]
    fn pending_turn_holds_one_placeholder() {
        let view = RecordingView::new();
        let mut display = Display {
            view: view.clone(),
            entries: Vec::new(),
            awaiting_reply: false,
        };

        let turn = PendingTurn::begin(
            &mut display,
            "Hello",
            TypingPlaceholder::for_bot("Amanda"),
        );
        assert!(turn.display.awaiting_reply);
        assert_eq!(
            turn.display.entries,
            vec![
                DisplayEntry::Message(Message::user("Hello")),
                DisplayEntry::Typing(TypingPlaceholder::for_bot("Amanda")),
            ]
        );
        assert_eq!(
            turn.display.entries.iter().filter(|e| e.is_typing()).count(),
            1
        );
        assert!(!view.controls_enabled());
        drop(turn);

        assert!(!display.awaiting_reply);
        assert_eq!(
            display.entries,
            vec![DisplayEntry::Message(Message::user("Hello"))]
        );
        assert!(view.controls_enabled());
    }

    /// Polls `fut` once, returning its output if it was ready.
    async fn poll_once<F: std::future::Future + Unpin>(fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            out = fut => Some(out),
            _ = std::future::ready(()) => None,
        }
    }
}
