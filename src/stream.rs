//! Incremental consumption of streamed tutor replies
//!
//! Each chunk re-renders the cumulative text into the newest turn of the
//! replying role, so the transcript grows in place while the reply arrives.

use crate::backend::BackendError;
use crate::chat::{ChatView, MessageLog, Role};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;

/// A reply body as handed over by the transport
pub enum TextSource {
    /// Chunks in arrival order
    Chunked(BoxStream<'static, Result<Bytes, BackendError>>),
    /// The whole body, when incremental reading is not available
    Complete(String),
}

impl std::fmt::Debug for TextSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextSource::Chunked(_) => f.write_str("TextSource::Chunked(..)"),
            TextSource::Complete(text) => f.debug_tuple("TextSource::Complete").field(text).finish(),
        }
    }
}

/// What a consumed reply produced
#[derive(Debug)]
pub struct StreamOutcome {
    /// Everything received, treated as the full reply
    pub text: String,
    /// Transport error that ended the stream early
    pub error: Option<BackendError>,
    /// Number of `update_last` renders performed
    pub updates: usize,
}

/// Drain `source` into the newest `role` turn of `log`.
///
/// Every chunk is a suspension point. No cancellation: the source is read
/// to its end or to the first transport error.
pub async fn consume<V: ChatView>(
    source: TextSource,
    log: &mut MessageLog<V>,
    role: Role,
) -> StreamOutcome {
    match source {
        TextSource::Complete(text) => {
            log.update_last(role, text.as_str());
            StreamOutcome {
                text,
                error: None,
                updates: 1,
            }
        }
        TextSource::Chunked(mut chunks) => {
            let mut decoder = Utf8Accumulator::default();
            let mut updates = 0;
            let mut error = None;

            while let Some(chunk) = chunks.next().await {
                match chunk {
                    Ok(bytes) => {
                        if decoder.push(&bytes) {
                            log.update_last(role, decoder.text());
                            updates += 1;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, received = decoder.text().len(), "Reply stream interrupted");
                        error = Some(e);
                        break;
                    }
                }
            }

            if decoder.finish() || updates == 0 {
                log.update_last(role, decoder.text());
                updates += 1;
            }

            StreamOutcome {
                text: decoder.into_text(),
                error,
                updates,
            }
        }
    }
}

/// UTF-8 decoder that tolerates code points split across chunks
#[derive(Debug, Default)]
struct Utf8Accumulator {
    text: String,
    /// Bytes of an incomplete trailing sequence
    pending: Vec<u8>,
}

impl Utf8Accumulator {
    /// Feed a chunk. Returns whether the decoded text grew.
    fn push(&mut self, chunk: &[u8]) -> bool {
        self.pending.extend_from_slice(chunk);
        let before = self.text.len();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(valid) => {
                    self.text.push_str(valid);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    // Prefix is valid by construction
                    self.text
                        .push_str(&String::from_utf8_lossy(&self.pending[..valid_up_to]));
                    match e.error_len() {
                        // Truncated sequence at the end: wait for the next chunk
                        None => {
                            self.pending.drain(..valid_up_to);
                            break;
                        }
                        Some(invalid) => {
                            self.text.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid_up_to + invalid);
                        }
                    }
                }
            }
        }

        self.text.len() != before
    }

    /// Flush a dangling partial sequence. Returns whether text changed.
    fn finish(&mut self) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        self.pending.clear();
        self.text.push(char::REPLACEMENT_CHARACTER);
        true
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn into_text(self) -> String {
        self.text
    }
}
