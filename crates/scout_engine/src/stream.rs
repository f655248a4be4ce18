use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use scout_logging::{scout_debug, scout_info};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    EngineEvent, FailureKind, FrameDecoder, Generation, StreamError, StreamSummary,
    Utf8ChunkDecoder,
};

#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Base url of the search service.
    pub api_url: String,
    /// Path of the search endpoint, relative to `api_url`.
    pub search_path: String,
    pub connect_timeout: Duration,
    /// Whole-request limit. `None` lets a search stream for as long as the
    /// server keeps the connection open.
    pub request_timeout: Option<Duration>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000".to_string(),
            search_path: "api/search".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

impl SearchSettings {
    pub fn endpoint(&self) -> Result<Url, StreamError> {
        let mut base = self.api_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Url::parse(&base)
            .and_then(|base| base.join(self.search_path.trim_start_matches('/')))
            .map_err(|err| StreamError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

pub trait PayloadSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelPayloadSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelPayloadSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl PayloadSink for ChannelPayloadSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait SearchStreamer: Send + Sync {
    /// Posts `body` and emits one [`EngineEvent::Payload`] per decoded frame
    /// until the stream ends, fails, or `cancel` fires.
    async fn stream(
        &self,
        generation: Generation,
        body: &Value,
        sink: &dyn PayloadSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, StreamError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchStreamer {
    settings: SearchSettings,
}

impl ReqwestSearchStreamer {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, StreamError> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| StreamError::new(FailureKind::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl SearchStreamer for ReqwestSearchStreamer {
    async fn stream(
        &self,
        generation: Generation,
        body: &Value,
        sink: &dyn PayloadSink,
        cancel: &CancellationToken,
    ) -> Result<StreamSummary, StreamError> {
        let endpoint = self.settings.endpoint()?;
        let client = self.build_client()?;
        scout_info!("Search {} posting to {}", generation, endpoint);

        let request = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "text/event-stream")
            .body(body.to_string())
            .send();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StreamError::cancelled()),
            response = request => response.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("Search failed: {}", status.as_u16()),
            ));
        }

        let mut summary = StreamSummary::default();
        let mut text = Utf8ChunkDecoder::new();
        let mut frames = FrameDecoder::new();
        let mut chunks = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(StreamError::cancelled()),
                chunk = chunks.next() => chunk,
            };
            let Some(chunk) = chunk else {
                break;
            };
            let chunk = chunk.map_err(map_reqwest_error)?;
            summary.bytes += chunk.len() as u64;

            for payload in frames.push(&text.decode(&chunk)) {
                summary.payloads += 1;
                sink.emit(EngineEvent::Payload {
                    generation,
                    payload,
                });
            }
            if frames.is_finished() {
                summary.saw_sentinel = true;
                break;
            }
        }

        for payload in frames.push(&text.finish()) {
            summary.payloads += 1;
            sink.emit(EngineEvent::Payload {
                generation,
                payload,
            });
        }
        if text.had_replacements() {
            scout_debug!("Search {} stream contained invalid UTF-8", generation);
        }
        summary.discarded_tail = frames.finish();

        scout_info!(
            "Search {} stream closed after {} payloads ({} bytes)",
            generation,
            summary.payloads,
            summary.bytes
        );
        Ok(summary)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> StreamError {
    if err.is_timeout() {
        return StreamError::new(FailureKind::Timeout, err.to_string());
    }
    StreamError::new(FailureKind::Network, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::SearchSettings;
    use crate::FailureKind;

    #[test]
    fn endpoint_joins_base_and_path() {
        let settings = SearchSettings::default();
        assert_eq!(
            settings.endpoint().unwrap().as_str(),
            "http://localhost:8000/api/search"
        );

        let nested = SearchSettings {
            api_url: "https://scout.example/backend".to_string(),
            ..SearchSettings::default()
        };
        assert_eq!(
            nested.endpoint().unwrap().as_str(),
            "https://scout.example/backend/api/search"
        );
    }

    #[test]
    fn endpoint_rejects_garbage() {
        let settings = SearchSettings {
            api_url: "not a url".to_string(),
            ..SearchSettings::default()
        };
        assert_eq!(settings.endpoint().unwrap_err().kind, FailureKind::InvalidUrl);
    }
}
