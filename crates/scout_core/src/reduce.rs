use scout_logging::scout_debug;

use crate::{SessionState, SourceAgentState, UpdateEvent};

/// Folds one event into the session. Never fails: events for unknown sources
/// and events that would move a source's status backwards are no-ops.
pub fn reduce(mut state: SessionState, event: &UpdateEvent) -> SessionState {
    apply(&mut state, event);
    state
}

/// In-place variant of [`reduce`]. Returns whether the event was applied.
pub(crate) fn apply(state: &mut SessionState, event: &UpdateEvent) -> bool {
    let Some(source) = event.source() else {
        scout_debug!("Ignoring event for unknown board {:?}", event.board);
        return false;
    };

    let previous = state.agent_handle(source);
    if event.status.regresses_from(&previous.status) {
        scout_debug!(
            "Ignoring {} status {} after {}",
            source,
            event.status,
            previous.status
        );
        return false;
    }

    let streaming_url = event
        .streaming_url
        .clone()
        .filter(|url| !url.is_empty())
        .or_else(|| previous.streaming_url.clone());
    let jobs = match &event.jobs {
        Some(jobs) => jobs.clone(),
        None => previous.jobs.clone(),
    };

    state.replace_agent(SourceAgentState {
        source,
        status: event.status.clone(),
        message: event.message.clone(),
        streaming_url,
        jobs,
        error: event.error.clone(),
    });

    if let Some(jobs) = &event.jobs {
        let added = state.merge_jobs(jobs);
        scout_debug!(
            "{} reported {} jobs, {} new in aggregate",
            source,
            jobs.len(),
            added
        );
    }
    true
}
