use serde::Deserialize;

use crate::{AgentStatus, JobRecord, Source};

/// One decoded progress event from a search agent.
///
/// `board` stays a raw string: resolving it against the known sources is the
/// reducer's job, and an unknown board is not a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateEvent {
    #[serde(default)]
    pub board: Option<String>,
    pub status: AgentStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub streaming_url: Option<String>,
    #[serde(default)]
    pub jobs: Option<Vec<JobRecord>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed event: {reason}")]
pub struct MalformedEvent {
    pub reason: String,
}

impl UpdateEvent {
    pub fn new(source: Source, status: AgentStatus) -> Self {
        Self {
            board: Some(source.id().to_string()),
            status,
            message: None,
            streaming_url: None,
            jobs: None,
            error: None,
        }
    }

    pub fn parse(payload: &str) -> Result<Self, MalformedEvent> {
        serde_json::from_str(payload).map_err(|err| MalformedEvent {
            reason: err.to_string(),
        })
    }

    /// The known source this event refers to, if any.
    pub fn source(&self) -> Option<Source> {
        self.board.as_deref().and_then(|raw| raw.parse().ok())
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_streaming_url(mut self, url: impl Into<String>) -> Self {
        self.streaming_url = Some(url.into());
        self
    }

    pub fn with_jobs(mut self, jobs: Vec<JobRecord>) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
