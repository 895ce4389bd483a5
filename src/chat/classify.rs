//! Exercise-vs-prose layout heuristic

use serde::Serialize;

/// Longest trimmed text (in characters) that can still render as an exercise
pub const MAX_EXERCISE_LEN: usize = 40;

/// How a chat turn is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextLayout {
    /// Short arithmetic; forced left-to-right so operands keep their order
    Exercise,
    /// Free text, rendered in the surrounding direction
    #[default]
    Plain,
}

/// Classify text for rendering.
///
/// Not a parser: anything made only of digits, arithmetic operators,
/// parentheses, `=`, `?` and whitespace is an exercise as long as it is at
/// most [`MAX_EXERCISE_LEN`] characters after trimming.
pub fn classify(text: &str) -> TextLayout {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_EXERCISE_LEN {
        return TextLayout::Plain;
    }

    if trimmed.chars().all(is_exercise_char) {
        TextLayout::Exercise
    } else {
        TextLayout::Plain
    }
}

fn is_exercise_char(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_whitespace()
        || matches!(c, '+' | '-' | '×' | '÷' | '*' | '/' | '(' | ')' | '=' | '?')
}
