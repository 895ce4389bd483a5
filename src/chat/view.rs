//! Rendering surface for the transcript

use super::classify::TextLayout;
use super::log::{ChatTurn, Role};
use std::io::Write;

/// Left-to-right isolate, closed by [`POP_DIRECTIONAL_ISOLATE`]
const LEFT_TO_RIGHT_ISOLATE: char = '\u{2066}';
const POP_DIRECTIONAL_ISOLATE: char = '\u{2069}';

/// Anything that can show the conversation.
///
/// Implementations only render; they never feed back into conversation state.
pub trait ChatView {
    /// A new turn was appended at `index`
    fn turn_appended(&mut self, index: usize, turn: &ChatTurn);

    /// The turn at `index` changed (streaming)
    fn turn_updated(&mut self, index: usize, turn: &ChatTurn);

    /// Bring the newest turn into view
    fn scroll_to_latest(&mut self) {}

    /// Show or hide the accept/reject affordance for a detected exercise
    fn set_confirmation_prompt(&mut self, visible: bool);

    /// Enable or disable student input while a request is pending
    fn set_input_enabled(&mut self, enabled: bool);
}

/// Line-oriented terminal renderer.
///
/// The newest turn stays "open" so streamed text can be printed as a
/// suffix; anything that is not a pure extension is re-printed on a new
/// line.
pub struct TerminalView<W: Write> {
    out: W,
    /// Index and rendered body of the turn whose line is still open
    open: Option<(usize, String)>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self { out, open: None }
    }

    #[allow(dead_code)] // Used by tests to inspect output
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|()| self.out.flush()) {
            tracing::debug!(error = %e, "Terminal write failed");
        }
    }

    fn close_line(&mut self) {
        if self.open.take().is_some() {
            self.emit("\n");
        }
    }

    fn print_turn(&mut self, index: usize, turn: &ChatTurn) {
        self.close_line();
        let body = render_body(turn);
        self.emit(&format!("{} {body}", role_prefix(turn.role)));
        self.open = Some((index, body));
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn turn_appended(&mut self, index: usize, turn: &ChatTurn) {
        self.print_turn(index, turn);
    }

    fn turn_updated(&mut self, index: usize, turn: &ChatTurn) {
        let body = render_body(turn);
        let suffix = match &self.open {
            Some((open_index, printed)) if *open_index == index => {
                body.strip_prefix(printed.as_str()).map(str::to_string)
            }
            _ => None,
        };

        match suffix {
            Some(suffix) => {
                self.emit(&suffix);
                self.open = Some((index, body));
            }
            None => self.print_turn(index, turn),
        }
    }

    fn set_confirmation_prompt(&mut self, visible: bool) {
        if visible {
            self.close_line();
            self.emit("   [/yes = זה התרגיל | /no = לא, אכתוב בעצמי]\n");
        }
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        if enabled {
            self.close_line();
            self.emit("> ");
        }
    }
}

fn role_prefix(role: Role) -> &'static str {
    match role {
        Role::Student => "את:",
        Role::Tutor => "מורה:",
    }
}

fn render_body(turn: &ChatTurn) -> String {
    match turn.layout {
        TextLayout::Exercise => {
            format!("{LEFT_TO_RIGHT_ISOLATE}{}{POP_DIRECTIONAL_ISOLATE}", turn.text.trim())
        }
        TextLayout::Plain => turn.text.clone(),
    }
}
