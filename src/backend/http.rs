//! HTTP implementation of the tutoring service client

use super::{
    BackendError, SessionId, StartFromImageResponse, StartFromTextRequest, StartFromTextResponse,
    StreamCheckRequest, StreamHintRequest, TutorBackend,
};
use crate::config::ClientConfig;
use crate::stream::TextSource;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// reqwest-backed [`TutorBackend`]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, BackendError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let response = ensure_success(response).await?;
        response
            .json::<Resp>()
            .await
            .map_err(|e| BackendError::decode(format!("Invalid response from {path}: {e}")))
    }

    async fn post_stream<Req>(&self, path: &str, body: &Req) -> Result<TextSource, BackendError>
    where
        Req: Serialize + Sync,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let response = ensure_success(response).await?;

        // A sized body is already fully buffered server-side; read it whole
        if response.content_length().is_some() {
            let text = response.text().await?;
            return Ok(TextSource::Complete(text));
        }

        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(BackendError::from))
            .boxed();
        Ok(TextSource::Chunked(chunks))
    }
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(BackendError::from_status(status, &body))
}

#[async_trait]
impl TutorBackend for HttpBackend {
    async fn start_from_text(
        &self,
        student_name: &str,
        question_text: &str,
    ) -> Result<StartFromTextResponse, BackendError> {
        self.post_json(
            "/exercises/start_from_text",
            &StartFromTextRequest {
                student_name,
                question_text,
            },
        )
        .await
    }

    async fn start_from_image(
        &self,
        student_name: &str,
        image: &Path,
    ) -> Result<StartFromImageResponse, BackendError> {
        let bytes = tokio::fs::read(image)
            .await
            .map_err(|e| BackendError::io(format!("Failed to read {}: {e}", image.display())))?;
        if bytes.is_empty() {
            return Err(BackendError::io(format!("{} is empty", image.display())));
        }

        let file_name = image
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        let mime = mime_guess::from_path(image).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime.as_ref())
            .map_err(|e| BackendError::invalid_request(format!("Bad content type {mime}: {e}")))?;

        let response = self
            .client
            .post(self.url("/exercises/start_from_image"))
            .query(&[("student_name", student_name)])
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        let response = ensure_success(response).await?;
        response
            .json::<StartFromImageResponse>()
            .await
            .map_err(|e| BackendError::decode(format!("Invalid image response: {e}")))
    }

    async fn stream_hint(
        &self,
        session_id: SessionId,
        student_message: &str,
    ) -> Result<TextSource, BackendError> {
        self.post_stream(
            "/stream/hint",
            &StreamHintRequest {
                session_id,
                student_message,
            },
        )
        .await
    }

    async fn stream_check(
        &self,
        session_id: SessionId,
        student_answer: &str,
    ) -> Result<TextSource, BackendError> {
        self.post_stream(
            "/stream/check",
            &StreamCheckRequest {
                session_id,
                student_answer,
            },
        )
        .await
    }
}
