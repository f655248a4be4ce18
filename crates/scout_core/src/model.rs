use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::Source;

/// One job posting reported by a search agent. `url` is the dedup key.
///
/// Agents may send `null` or omit the text fields; those read as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    pub source: Source,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Agent status as reported on the wire.
///
/// Values outside the known set are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Error,
    Other(String),
}

impl AgentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AgentStatus::Pending => "pending",
            AgentStatus::Running => "running",
            AgentStatus::Completed => "completed",
            AgentStatus::Error => "error",
            AgentStatus::Other(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStatus::Completed | AgentStatus::Error)
    }

    /// Position in the `pending -> running -> terminal` progression.
    /// Unknown values sit with `running`.
    fn rank(&self) -> u8 {
        match self {
            AgentStatus::Pending => 0,
            AgentStatus::Running | AgentStatus::Other(_) => 1,
            AgentStatus::Completed | AgentStatus::Error => 2,
        }
    }

    /// True when moving from `current` to `self` would go backwards.
    pub fn regresses_from(&self, current: &AgentStatus) -> bool {
        self.rank() < current.rank()
    }
}

impl From<String> for AgentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => AgentStatus::Pending,
            "running" => AgentStatus::Running,
            "completed" => AgentStatus::Completed,
            "error" => AgentStatus::Error,
            _ => AgentStatus::Other(raw),
        }
    }
}

impl From<AgentStatus> for String {
    fn from(status: AgentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live state of one search agent within a session.
///
/// Held behind an `Arc` by [`crate::SessionState`] and replaced wholesale on
/// every applied event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAgentState {
    pub source: Source,
    pub status: AgentStatus,
    pub message: Option<String>,
    pub streaming_url: Option<String>,
    pub jobs: Vec<JobRecord>,
    pub error: Option<String>,
}

impl SourceAgentState {
    /// Baseline for a source that is not part of a running search.
    pub fn waiting(source: Source) -> Self {
        Self::pending(source, "Waiting...")
    }

    /// Baseline for a source selected for the search being started.
    pub fn queued(source: Source) -> Self {
        Self::pending(source, "Queued...")
    }

    fn pending(source: Source, message: &str) -> Self {
        Self {
            source,
            status: AgentStatus::Pending,
            message: Some(message.to_string()),
            streaming_url: None,
            jobs: Vec::new(),
            error: None,
        }
    }
}
