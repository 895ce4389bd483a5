//! Events that can occur in a conversation

use super::state::{ReplyKind, Subject};
use crate::backend::{BackendErrorKind, StartFromImageResponse, StartFromTextResponse};
use std::path::PathBuf;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // Student events
    SubjectSelected {
        subject: Subject,
    },
    StudentMessage {
        text: String,
    },
    FinalAnswer {
        text: String,
    },
    ImageSelected {
        path: PathBuf,
    },
    AcceptExercise,
    RejectExercise,

    // Backend events
    ExerciseStarted {
        response: StartFromTextResponse,
    },
    ExerciseStartFailed {
        kind: BackendErrorKind,
        message: String,
    },
    ImageProcessed {
        response: StartFromImageResponse,
    },
    ImageUploadFailed {
        kind: BackendErrorKind,
        message: String,
    },
    ReplyFinished {
        kind: ReplyKind,
        /// Everything received
        text: String,
        /// Stream ended on a transport error
        interrupted: bool,
    },
}

impl Event {
    /// Whether the event originates from the student rather than the backend
    pub fn is_student_action(&self) -> bool {
        matches!(
            self,
            Event::SubjectSelected { .. }
                | Event::StudentMessage { .. }
                | Event::FinalAnswer { .. }
                | Event::ImageSelected { .. }
                | Event::AcceptExercise
                | Event::RejectExercise
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Event::SubjectSelected { .. } => "subject_selected",
            Event::StudentMessage { .. } => "student_message",
            Event::FinalAnswer { .. } => "final_answer",
            Event::ImageSelected { .. } => "image_selected",
            Event::AcceptExercise => "accept_exercise",
            Event::RejectExercise => "reject_exercise",
            Event::ExerciseStarted { .. } => "exercise_started",
            Event::ExerciseStartFailed { .. } => "exercise_start_failed",
            Event::ImageProcessed { .. } => "image_processed",
            Event::ImageUploadFailed { .. } => "image_upload_failed",
            Event::ReplyFinished { .. } => "reply_finished",
        }
    }
}
