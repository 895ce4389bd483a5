//! Client configuration from the environment

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_STUDENT_NAME: &str = "Shira";

/// Settings for talking to the tutoring service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the tutoring service, without trailing slash
    pub api_url: String,
    /// Sent with every exercise start
    pub student_name: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            student_name: DEFAULT_STUDENT_NAME.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = non_empty("TUTOR_API_URL").map_or_else(
            || DEFAULT_API_URL.to_string(),
            |url| url.trim_end_matches('/').to_string(),
        );
        let student_name =
            non_empty("TUTOR_STUDENT_NAME").unwrap_or_else(|| DEFAULT_STUDENT_NAME.to_string());
        let request_timeout = non_empty("TUTOR_REQUEST_TIMEOUT_SECS")
            .and_then(|secs| secs.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self {
            api_url,
            student_name,
            request_timeout,
        }
    }
}
