//! Terminal rendering for the chat application.
//!
//! [`TerminalView`] draws the chat display on a terminal.  User and bot lines
//! are coloured the way the desktop front end colours senders (green for the
//! user, blue for the bot) and the typing placeholder is drawn dim and erased
//! in place once the reply arrives.
//!
//! Bot replies are printed as plain text.  Control characters, including the
//! ESC that starts an ANSI sequence, are stripped first, so a reply can never
//! move the cursor, recolour the terminal or rewrite earlier lines.

use std::borrow::Cow;
use std::io::{self, Stdout, Write};

use crate::chat::view::ChatView;
use crate::types::{Message, Sender, TypingPlaceholder};

/// ANSI escape code for dim text (used for the typing placeholder).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for italic text (used for the typing placeholder).
const ANSI_ITALIC: &str = "\x1b[3m";

/// ANSI escape code for bold text (used for sender labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for green text (used for the user label).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for blue text (used for the bot label).
const ANSI_BLUE: &str = "\x1b[34m";

/// Move up to the previous line, return to column zero and erase it.
const ERASE_PREVIOUS_LINE: &str = "\x1b[1A\r\x1b[2K";

/// Label shown for the user's own lines.
const USER_LABEL: &str = "You";

/// Terminal implementation of [`ChatView`].
pub struct TerminalView<W: Write + Send = Stdout> {
    out: W,
    bot_name: String,
    use_color: bool,
    echo_user: bool,
    typing_shown: bool,
    controls_enabled: bool,
}

impl TerminalView<Stdout> {
    /// Creates a view on stdout with ANSI colors enabled.
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self::with_writer(io::stdout(), bot_name, true)
    }

    /// Creates a view on stdout with the specified color setting.
    pub fn with_color(bot_name: impl Into<String>, use_color: bool) -> Self {
        Self::with_writer(io::stdout(), bot_name, use_color)
    }
}

impl<W: Write + Send> TerminalView<W> {
    /// Creates a view that writes to `out`.
    pub fn with_writer(out: W, bot_name: impl Into<String>, use_color: bool) -> Self {
        Self {
            out,
            bot_name: bot_name.into(),
            use_color,
            echo_user: true,
            typing_shown: false,
            controls_enabled: false,
        }
    }

    /// Whether user messages are echoed.
    ///
    /// A line editor already leaves the typed line on screen, so the REPL
    /// turns echoing off.
    pub fn echo_user(mut self, echo: bool) -> Self {
        self.echo_user = echo;
        self
    }

    /// Whether the input is currently accepting text.
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Print an informational line outside the message list.
    pub fn print_info(&mut self, info: &str) {
        let _ = writeln!(self.out, "{info}");
        self.flush();
    }

    /// Print an error line outside the message list.
    pub fn print_error(&mut self, error: &str) {
        let _ = writeln!(self.out, "Error: {error}");
        self.flush();
    }

    /// Re-print `messages` in order, user lines included.
    pub fn print_history<'a>(&mut self, messages: impl IntoIterator<Item = &'a Message>) {
        for message in messages {
            self.write_message(message);
        }
        self.flush();
    }

    /// Consumes the view and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }

    fn write_message(&mut self, message: &Message) {
        let (label, color) = match message.sender {
            Sender::User => (USER_LABEL, ANSI_GREEN),
            Sender::Bot => (self.bot_name.as_str(), ANSI_BLUE),
        };
        let text = plain_text(&message.text);
        let _ = if self.use_color {
            writeln!(self.out, "{ANSI_BOLD}{color}{label}{ANSI_RESET}: {text}")
        } else {
            writeln!(self.out, "{label}: {text}")
        };
    }
}

impl<W: Write + Send> ChatView for TerminalView<W> {
    fn append_message(&mut self, message: &Message) {
        if message.is_user() && !self.echo_user {
            return;
        }
        self.write_message(message);
        self.flush();
    }

    fn show_typing(&mut self, placeholder: &TypingPlaceholder) {
        // The placeholder owns a whole line so output written to the same
        // terminal in the meantime starts below it instead of after it.
        let _ = if self.use_color {
            writeln!(
                self.out,
                "{ANSI_DIM}{ANSI_ITALIC}{}{ANSI_RESET}",
                placeholder.label
            )
        } else {
            writeln!(self.out, "{}", placeholder.label)
        };
        self.typing_shown = true;
        self.flush();
    }

    fn remove_typing(&mut self) {
        // Without escape sequences the placeholder line stays.
        if self.typing_shown && self.use_color {
            let _ = write!(self.out, "{ERASE_PREVIOUS_LINE}");
        }
        self.typing_shown = false;
        self.flush();
    }

    fn clear_input(&mut self) {}

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn focus_input(&mut self) {}
}

/// Strip control characters from `text` so it is safe to print verbatim.
///
/// Newlines and tabs are kept; every other control character is dropped.
pub fn plain_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_printable) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_printable(*c)).collect())
    }
}

fn is_printable(c: char) -> bool {
    c == '\n' || c == '\t' || !c.is_control()
}
