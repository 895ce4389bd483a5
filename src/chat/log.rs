//! Ordered chat transcript

use super::classify::{classify, TextLayout};
use super::view::ChatView;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who said it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Tutor,
}

/// One rendered turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    pub layout: TextLayout,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    fn new(role: Role, text: String) -> Self {
        let layout = classify(&text);
        Self {
            role,
            text,
            layout,
            created_at: Utc::now(),
        }
    }
}

/// Append-only transcript bound to a view.
///
/// The only mutation of an existing turn is [`MessageLog::update_last`],
/// which streaming uses to grow the newest turn of a role in place.
pub struct MessageLog<V: ChatView> {
    turns: Vec<ChatTurn>,
    view: V,
}

impl<V: ChatView> MessageLog<V> {
    pub fn new(view: V) -> Self {
        Self {
            turns: Vec::new(),
            view,
        }
    }

    /// Append a turn and render it. Returns its index.
    pub fn append(&mut self, role: Role, text: impl Into<String>) -> usize {
        let turn = ChatTurn::new(role, text.into());
        let index = self.turns.len();
        self.view.turn_appended(index, &turn);
        self.turns.push(turn);
        self.view.scroll_to_latest();
        index
    }

    /// Replace the text of the newest turn with `role`.
    ///
    /// No-op when the log holds no such turn. Layout is recomputed, so a
    /// turn can switch between exercise and plain rendering mid-stream.
    pub fn update_last(&mut self, role: Role, text: impl Into<String>) -> Option<usize> {
        let index = self.turns.iter().rposition(|t| t.role == role)?;
        let text = text.into();
        let turn = &mut self.turns[index];
        turn.layout = classify(&text);
        turn.text = text;
        self.view.turn_updated(index, turn);
        self.view.scroll_to_latest();
        Some(index)
    }

    #[allow(dead_code)] // Transcript queries used by tests
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Newest turn with `role`
    #[allow(dead_code)]
    pub fn last(&self, role: Role) -> Option<&ChatTurn> {
        self.turns.iter().rev().find(|t| t.role == role)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop all turns (the view keeps whatever it already rendered)
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    #[allow(dead_code)]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[allow(dead_code)] // Used by tests to inspect rendered output
    pub fn into_view(self) -> V {
        self.view
    }
}
