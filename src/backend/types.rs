//! Wire types for the tutoring service

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned identifier of one exercise-solving exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub i64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StartFromTextRequest<'a> {
    pub student_name: &'a str,
    pub question_text: &'a str,
}

/// Response of `POST /exercises/start_from_text`.
///
/// Only the fields the conversation acts on; the service also sends the
/// classified subject, skills and hint level.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StartFromTextResponse {
    pub allowed: bool,
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default)]
    pub hint_text: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `POST /exercises/start_from_image`.
///
/// Math and geometry sheets come back as `exercises`; English sheets as
/// `tasks` plus a `tasks_summary`. A session the service may open for the
/// first exercise is not used; accepting an exercise starts its own.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StartFromImageResponse {
    pub allowed: bool,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub exercises: Option<Vec<String>>,
    #[serde(default)]
    pub tasks: Option<Vec<String>>,
    #[serde(default)]
    pub tasks_summary: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StartFromImageResponse {
    /// Extracted exercises with blank entries removed
    pub fn exercise_list(&self) -> Vec<String> {
        non_blank(self.exercises.as_deref())
    }

    /// Extracted English tasks with blank entries removed
    pub fn task_list(&self) -> Vec<String> {
        non_blank(self.tasks.as_deref())
    }

    pub fn is_english(&self) -> bool {
        self.subject
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("english"))
    }
}

fn non_blank(items: Option<&[String]>) -> Vec<String> {
    items
        .unwrap_or_default()
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamHintRequest<'a> {
    pub session_id: SessionId,
    pub student_message: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamCheckRequest<'a> {
    pub session_id: SessionId,
    pub student_answer: &'a str,
}
