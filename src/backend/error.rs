//! Backend error types

use reqwest::StatusCode;
use thiserror::Error;

/// Backend error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Timeout, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::InvalidRequest, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Decode, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Io, message)
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {}", body.trim())
        };

        let kind = match status {
            StatusCode::NOT_FOUND => BackendErrorKind::NotFound,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => BackendErrorKind::Timeout,
            s if s.is_server_error() => BackendErrorKind::ServerError,
            s if s.is_client_error() => BackendErrorKind::InvalidRequest,
            _ => BackendErrorKind::Unknown,
        };

        Self::new(kind, message)
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(e.to_string())
        } else if e.is_decode() {
            Self::decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::from_status(status, "")
        } else {
            Self::network(e.to_string())
        }
    }
}

/// Error classification, used for logging and for choosing the message
/// shown to the student
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Connection refused, reset, DNS
    Network,
    /// Request exceeded the configured timeout
    Timeout,
    /// 5xx
    ServerError,
    /// 404, e.g. the session no longer exists on the backend
    NotFound,
    /// Other 4xx
    InvalidRequest,
    /// Body could not be decoded
    Decode,
    /// Local I/O, e.g. reading the image to upload
    Io,
    Unknown,
}

impl BackendErrorKind {
    /// Whether the request never produced a usable response
    pub fn is_transport(self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }
}
