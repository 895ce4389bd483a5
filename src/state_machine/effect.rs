//! Effects produced by state transitions

use super::state::ReplyKind;
use crate::backend::SessionId;
use crate::chat::Role;
use std::path::PathBuf;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Add a turn to the chat
    AppendTurn { role: Role, text: String },

    /// Rewrite the newest turn of `role`
    UpdateLastTurn { role: Role, text: String },

    /// Show or hide the yes/no prompt for a detected exercise
    SetConfirmationPrompt { visible: bool },

    /// Open a backend session for an exercise
    StartExercise { question_text: String },

    /// Upload an image for exercise extraction
    UploadImage { path: PathBuf },

    /// Stream a hint or check reply into the newest tutor turn
    StreamReply {
        kind: ReplyKind,
        session_id: SessionId,
        text: String,
    },
}

impl Effect {
    pub fn student_says(text: impl Into<String>) -> Self {
        Effect::AppendTurn {
            role: Role::Student,
            text: text.into(),
        }
    }

    pub fn tutor_says(text: impl Into<String>) -> Self {
        Effect::AppendTurn {
            role: Role::Tutor,
            text: text.into(),
        }
    }

    pub fn replace_tutor_text(text: impl Into<String>) -> Self {
        Effect::UpdateLastTurn {
            role: Role::Tutor,
            text: text.into(),
        }
    }

    pub fn show_confirmation() -> Self {
        Effect::SetConfirmationPrompt { visible: true }
    }

    pub fn hide_confirmation() -> Self {
        Effect::SetConfirmationPrompt { visible: false }
    }

    /// Whether executing this effect talks to the backend
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Effect::StartExercise { .. } | Effect::UploadImage { .. } | Effect::StreamReply { .. }
        )
    }
}
