use crate::{AgentStatus, Generation, JobRecord, Source, SourceAgentState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Streaming,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: SessionPhase,
    pub generation: Generation,
    /// Cards for the sources selected in the current search, in request order.
    pub agents: Vec<AgentCardView>,
    pub summary: SummaryView,
    pub jobs: Vec<JobRecord>,
    pub error: Option<String>,
    /// Payloads dropped because they failed to parse.
    pub dropped_events: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentCardView {
    pub source: Source,
    pub name: &'static str,
    pub status: AgentStatus,
    pub message: Option<String>,
    pub streaming_url: Option<String>,
    pub job_count: usize,
    pub error: Option<String>,
}

impl AgentCardView {
    pub(crate) fn from_state(state: &SourceAgentState) -> Self {
        Self {
            source: state.source,
            name: state.source.display_name(),
            status: state.status.clone(),
            message: state.message.clone(),
            streaming_url: state.streaming_url.clone(),
            job_count: state.jobs.len(),
            error: state.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryView {
    pub boards: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    pub jobs_found: usize,
}
