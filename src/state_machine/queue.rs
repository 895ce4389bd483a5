//! Pending exercises extracted from one image

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("No exercise after the current one")]
    NoNextExercise,
}

/// Ordered exercises plus a cursor into them.
///
/// The cursor is `None` exactly when the queue is empty, and otherwise
/// always points at an item. Contents are only ever replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseQueue {
    items: Vec<String>,
    cursor: Option<usize>,
    /// Items are open tasks answered in free text, not exercises to confirm
    #[serde(default)]
    free_form: bool,
}

impl ExerciseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue loaded with `items`, cursor on the first one
    #[allow(dead_code)] // Used by tests
    pub fn from_items(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut queue = Self::new();
        queue.load(items);
        queue
    }

    pub fn load(&mut self, items: impl IntoIterator<Item = impl Into<String>>) {
        self.items = items.into_iter().map(Into::into).collect();
        self.cursor = if self.items.is_empty() { None } else { Some(0) };
        self.free_form = false;
    }

    /// Like [`load`](Self::load), for worksheet tasks answered in free text
    pub fn load_tasks(&mut self, items: impl IntoIterator<Item = impl Into<String>>) {
        self.load(items);
        self.free_form = !self.items.is_empty();
    }

    pub fn is_free_form(&self) -> bool {
        self.free_form
    }

    pub fn current(&self) -> Option<&str> {
        self.cursor
            .and_then(|c| self.items.get(c))
            .map(String::as_str)
    }

    pub fn has_next(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.items.len())
    }

    /// Move to the next exercise and return it
    pub fn advance(&mut self) -> Result<&str, QueueError> {
        if !self.has_next() {
            return Err(QueueError::NoNextExercise);
        }
        let next = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(next);
        self.items
            .get(next)
            .map(String::as_str)
            .ok_or(QueueError::NoNextExercise)
    }

    pub fn is_last(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 == self.items.len())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = None;
        self.free_form = false;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[allow(dead_code)]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// 1-based position and total, for "exercise n of m" prompts
    pub fn position(&self) -> Option<(usize, usize)> {
        self.cursor.map(|c| (c + 1, self.items.len()))
    }
}
