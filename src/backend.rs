//! Tutoring service client
//!
//! The conversation only talks to the backend through [`TutorBackend`], so
//! the runtime can be driven by mocks in tests.

mod error;
mod http;
mod types;

pub use error::{BackendError, BackendErrorKind};
pub use http::HttpBackend;
pub use types::*;

use crate::stream::TextSource;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Calls the conversation issues against the tutoring service
#[async_trait]
pub trait TutorBackend: Send + Sync {
    /// Open a session for a typed (or confirmed) exercise
    async fn start_from_text(
        &self,
        student_name: &str,
        question_text: &str,
    ) -> Result<StartFromTextResponse, BackendError>;

    /// Upload a worksheet photo for exercise extraction
    async fn start_from_image(
        &self,
        student_name: &str,
        image: &Path,
    ) -> Result<StartFromImageResponse, BackendError>;

    /// Ask for the next hint within a session
    async fn stream_hint(
        &self,
        session_id: SessionId,
        student_message: &str,
    ) -> Result<TextSource, BackendError>;

    /// Submit a final answer for checking
    async fn stream_check(
        &self,
        session_id: SessionId,
        student_answer: &str,
    ) -> Result<TextSource, BackendError>;
}

#[async_trait]
impl<T: TutorBackend + ?Sized> TutorBackend for Arc<T> {
    async fn start_from_text(
        &self,
        student_name: &str,
        question_text: &str,
    ) -> Result<StartFromTextResponse, BackendError> {
        (**self).start_from_text(student_name, question_text).await
    }

    async fn start_from_image(
        &self,
        student_name: &str,
        image: &Path,
    ) -> Result<StartFromImageResponse, BackendError> {
        (**self).start_from_image(student_name, image).await
    }

    async fn stream_hint(
        &self,
        session_id: SessionId,
        student_message: &str,
    ) -> Result<TextSource, BackendError> {
        (**self).stream_hint(session_id, student_message).await
    }

    async fn stream_check(
        &self,
        session_id: SessionId,
        student_answer: &str,
    ) -> Result<TextSource, BackendError> {
        (**self).stream_check(session_id, student_answer).await
    }
}

/// Logging wrapper for backends
pub struct LoggingBackend<B> {
    inner: B,
}

impl<B: TutorBackend> LoggingBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    fn log_outcome<T>(
        call: &'static str,
        start: std::time::Instant,
        result: &Result<T, BackendError>,
    ) {
        let duration = start.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    call,
                    duration_ms = %duration.as_millis(),
                    "Backend call completed"
                );
            }
            Err(e) if e.kind.is_transport() => {
                tracing::warn!(
                    call,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Backend unreachable"
                );
            }
            Err(e) => {
                tracing::error!(
                    call,
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Backend call failed"
                );
            }
        }
    }
}

#[async_trait]
impl<B: TutorBackend> TutorBackend for LoggingBackend<B> {
    async fn start_from_text(
        &self,
        student_name: &str,
        question_text: &str,
    ) -> Result<StartFromTextResponse, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.start_from_text(student_name, question_text).await;
        Self::log_outcome("start_from_text", start, &result);
        if let Ok(response) = &result {
            tracing::debug!(
                allowed = response.allowed,
                session_id = ?response.session_id,
                "Exercise start response"
            );
        }
        result
    }

    async fn start_from_image(
        &self,
        student_name: &str,
        image: &Path,
    ) -> Result<StartFromImageResponse, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.start_from_image(student_name, image).await;
        Self::log_outcome("start_from_image", start, &result);
        if let Ok(response) = &result {
            tracing::debug!(
                allowed = response.allowed,
                subject = ?response.subject,
                exercises = response.exercise_list().len(),
                tasks = response.task_list().len(),
                "Image start response"
            );
        }
        result
    }

    async fn stream_hint(
        &self,
        session_id: SessionId,
        student_message: &str,
    ) -> Result<TextSource, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.stream_hint(session_id, student_message).await;
        Self::log_outcome("stream_hint", start, &result);
        result
    }

    async fn stream_check(
        &self,
        session_id: SessionId,
        student_answer: &str,
    ) -> Result<TextSource, BackendError> {
        let start = std::time::Instant::now();
        let result = self.inner.stream_check(session_id, student_answer).await;
        Self::log_outcome("stream_check", start, &result);
        result
    }
}
