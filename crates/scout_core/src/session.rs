use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use crate::{JobRecord, Source, SourceAgentState};

/// Everything known about the current search.
///
/// Every [`Source`] has an entry in the agent map at all times, and the
/// aggregate job list never holds two records with the same url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    agents: BTreeMap<Source, Arc<SourceAgentState>>,
    jobs: Vec<JobRecord>,
    seen_urls: HashSet<String>,
    in_flight: bool,
    error: Option<String>,
    selected: Vec<Source>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::idle()
    }
}

impl SessionState {
    /// Baseline with no search selected: every source waiting.
    pub fn idle() -> Self {
        Self {
            agents: Source::ALL
                .into_iter()
                .map(|source| (source, Arc::new(SourceAgentState::waiting(source))))
                .collect(),
            jobs: Vec::new(),
            seen_urls: HashSet::new(),
            in_flight: false,
            error: None,
            selected: Vec::new(),
        }
    }

    /// Fresh state for a search over `boards`, marked in flight.
    pub fn for_search(boards: &[Source]) -> Self {
        let mut state = Self::idle();
        for &board in boards {
            state
                .agents
                .insert(board, Arc::new(SourceAgentState::queued(board)));
        }
        state.selected = boards.to_vec();
        state.in_flight = true;
        state
    }

    pub fn agent(&self, source: Source) -> &SourceAgentState {
        &self.agents[&source]
    }

    /// Shared handle to a source's state; cheap to clone and keep.
    pub fn agent_handle(&self, source: Source) -> Arc<SourceAgentState> {
        Arc::clone(&self.agents[&source])
    }

    pub fn agents(&self) -> impl Iterator<Item = &SourceAgentState> {
        self.agents.values().map(Arc::as_ref)
    }

    pub fn jobs(&self) -> &[JobRecord] {
        &self.jobs
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected(&self) -> &[Source] {
        &self.selected
    }

    pub(crate) fn replace_agent(&mut self, next: SourceAgentState) {
        self.agents.insert(next.source, Arc::new(next));
    }

    /// Appends jobs whose url is not yet in the aggregate list.
    /// Returns the number of records added.
    pub(crate) fn merge_jobs(&mut self, jobs: &[JobRecord]) -> usize {
        let before = self.jobs.len();
        for job in jobs {
            if self.seen_urls.insert(job.url.clone()) {
                self.jobs.push(job.clone());
            }
        }
        self.jobs.len() - before
    }

    pub(crate) fn finish(&mut self) {
        self.in_flight = false;
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.in_flight = false;
        self.error = Some(message);
    }
}
