use scout_logging::{scout_info, scout_warn};

use crate::reduce::apply;
use crate::view_model::{AgentCardView, AppViewModel, SessionPhase, SummaryView};
use crate::{AgentStatus, SearchRequest, SessionState, UpdateEvent};

/// Session token stamped on every stream. Bumped on each start and reset.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    generation: Generation,
    dropped_events: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn view(&self) -> AppViewModel {
        let session = &self.session;
        let agents: Vec<AgentCardView> = session
            .selected()
            .iter()
            .map(|&source| AgentCardView::from_state(session.agent(source)))
            .collect();
        let summary = SummaryView {
            boards: agents.len(),
            running: count_status(&agents, AgentStatus::Running),
            completed: count_status(&agents, AgentStatus::Completed),
            failed: count_status(&agents, AgentStatus::Error),
            jobs_found: session.jobs().len(),
        };

        AppViewModel {
            phase: self.phase(),
            generation: self.generation,
            agents,
            summary,
            jobs: session.jobs().to_vec(),
            error: session.error().map(ToOwned::to_owned),
            dropped_events: self.dropped_events,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        let session = &self.session;
        if session.is_in_flight() {
            SessionPhase::Streaming
        } else if session.error().is_some() {
            SessionPhase::Failed
        } else if session.selected().is_empty() {
            SessionPhase::Idle
        } else {
            SessionPhase::Completed
        }
    }

    /// Returns the dirty flag and clears it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Generation of the stream that is still being read, if any.
    pub(crate) fn live_generation(&self) -> Option<Generation> {
        self.session.is_in_flight().then_some(self.generation)
    }

    /// Stream results are applied only while that stream's session is current.
    pub(crate) fn accepts(&self, generation: Generation) -> bool {
        self.live_generation() == Some(generation)
    }

    pub(crate) fn start_session(&mut self, request: &SearchRequest) -> Generation {
        self.generation += 1;
        self.session = SessionState::for_search(request.job_boards());
        self.dropped_events = 0;
        self.dirty = true;
        scout_info!(
            "Search {} started: keywords={:?} location={:?} boards={:?}",
            self.generation,
            request.keywords(),
            request.location(),
            request.job_boards()
        );
        self.generation
    }

    pub(crate) fn reset_session(&mut self) {
        self.generation += 1;
        self.session = SessionState::idle();
        self.dropped_events = 0;
        self.dirty = true;
    }

    pub(crate) fn apply_event(&mut self, event: &UpdateEvent) {
        if apply(&mut self.session, event) {
            self.dirty = true;
        }
    }

    pub(crate) fn note_dropped_event(&mut self) {
        self.dropped_events += 1;
        self.dirty = true;
    }

    pub(crate) fn finish_session(&mut self) {
        self.session.finish();
        self.dirty = true;
        scout_info!(
            "Search {} completed with {} jobs",
            self.generation,
            self.session.jobs().len()
        );
    }

    pub(crate) fn fail_session(&mut self, message: String) {
        scout_warn!("Search {} failed: {}", self.generation, message);
        self.session.fail(message);
        self.dirty = true;
    }
}

fn count_status(agents: &[AgentCardView], status: AgentStatus) -> usize {
    agents.iter().filter(|agent| agent.status == status).count()
}
