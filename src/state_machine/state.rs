//! Conversation state types

use super::queue::ExerciseQueue;
use crate::backend::SessionId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tutoring subject, chosen once per conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    English,
    Math,
    Geometry,
}

impl Subject {
    #[allow(dead_code)] // Used by tests
    pub const ALL: [Subject; 3] = [Subject::English, Subject::Math, Subject::Geometry];

    /// Parse an English or Hebrew subject name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "english" | "אנגלית" => Some(Subject::English),
            "math" | "maths" | "חשבון" | "מתמטיקה" => Some(Subject::Math),
            "geometry" | "גאומטריה" | "גיאומטריה" => Some(Subject::Geometry),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Subject::English => "english",
            Subject::Math => "math",
            Subject::Geometry => "geometry",
        }
    }

    /// Name shown to the student
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::English => "אנגלית",
            Subject::Math => "חשבון",
            Subject::Geometry => "גאומטריה",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which streaming endpoint a reply comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    Hint,
    Check,
}

/// Where an exercise start was requested from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOrigin {
    /// Typed by the student
    Typed,
    /// Accepted from a detected set
    Confirmed,
}

/// Conversation state
///
/// Each variant carries exactly the data valid in it: a pending
/// confirmation has no session, and at most one session exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TutorState {
    /// Waiting for the student to pick a subject
    #[default]
    NoSubject,

    /// Subject chosen, no active exercise
    Ready {
        subject: Subject,
        /// Detected set, kept across a rejected confirmation
        queue: ExerciseQueue,
    },

    /// A detected exercise is shown and waits for yes/no.
    /// `queue.current()` is always the exercise on offer.
    AwaitingConfirmation {
        subject: Subject,
        queue: ExerciseQueue,
    },

    /// `start_from_text` in flight
    StartingExercise {
        subject: Subject,
        queue: ExerciseQueue,
        origin: StartOrigin,
    },

    /// `start_from_image` in flight; `queue` is the set before the upload
    UploadingImage {
        subject: Subject,
        queue: ExerciseQueue,
    },

    /// Backend session open for the current exercise
    ExerciseInProgress {
        subject: Subject,
        session_id: SessionId,
        queue: ExerciseQueue,
    },

    /// Hint or check reply streaming in
    Replying {
        subject: Subject,
        session_id: SessionId,
        queue: ExerciseQueue,
        kind: ReplyKind,
    },
}

impl TutorState {
    pub fn subject(&self) -> Option<Subject> {
        match self {
            TutorState::NoSubject => None,
            TutorState::Ready { subject, .. }
            | TutorState::AwaitingConfirmation { subject, .. }
            | TutorState::StartingExercise { subject, .. }
            | TutorState::UploadingImage { subject, .. }
            | TutorState::ExerciseInProgress { subject, .. }
            | TutorState::Replying { subject, .. } => Some(*subject),
        }
    }

    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            TutorState::ExerciseInProgress { session_id, .. }
            | TutorState::Replying { session_id, .. } => Some(*session_id),
            _ => None,
        }
    }

    pub fn queue(&self) -> Option<&ExerciseQueue> {
        match self {
            TutorState::NoSubject => None,
            TutorState::Ready { queue, .. }
            | TutorState::AwaitingConfirmation { queue, .. }
            | TutorState::StartingExercise { queue, .. }
            | TutorState::UploadingImage { queue, .. }
            | TutorState::ExerciseInProgress { queue, .. }
            | TutorState::Replying { queue, .. } => Some(queue),
        }
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(self, TutorState::AwaitingConfirmation { .. })
    }

    /// A backend request is in flight
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            TutorState::StartingExercise { .. }
                | TutorState::UploadingImage { .. }
                | TutorState::Replying { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            TutorState::NoSubject => "no_subject",
            TutorState::Ready { .. } => "ready",
            TutorState::AwaitingConfirmation { .. } => "awaiting_confirmation",
            TutorState::StartingExercise { .. } => "starting_exercise",
            TutorState::UploadingImage { .. } => "uploading_image",
            TutorState::ExerciseInProgress { .. } => "exercise_in_progress",
            TutorState::Replying { .. } => "replying",
        }
    }
}

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub conversation_id: String,
    pub student_name: String,
}

impl ConvContext {
    pub fn new(conversation_id: impl Into<String>, student_name: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            student_name: student_name.into(),
        }
    }
}
