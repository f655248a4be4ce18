use scout_logging::{scout_trace, scout_warn};

use crate::{AppState, Effect, Msg, UpdateEvent};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted(request) => {
            let mut effects = Vec::with_capacity(2);
            if let Some(generation) = state.live_generation() {
                effects.push(Effect::CancelStream { generation });
            }
            let generation = state.start_session(&request);
            effects.push(Effect::OpenStream {
                generation,
                request,
            });
            effects
        }
        Msg::ResetClicked => {
            let live = state.live_generation();
            state.reset_session();
            live.map(|generation| vec![Effect::CancelStream { generation }])
                .unwrap_or_default()
        }
        Msg::StreamPayload {
            generation,
            payload,
        } => {
            if !state.accepts(generation) {
                scout_trace!("Discarding payload from stale search {}", generation);
                return (state, Vec::new());
            }
            match UpdateEvent::parse(&payload) {
                Ok(event) => state.apply_event(&event),
                Err(err) => {
                    // Partial or corrupted frames are expected near stream end.
                    scout_warn!("Dropping payload of search {}: {}", generation, err);
                    state.note_dropped_event();
                }
            }
            Vec::new()
        }
        Msg::StreamFinished { generation } => {
            if state.accepts(generation) {
                state.finish_session();
            }
            Vec::new()
        }
        Msg::StreamFailed {
            generation,
            message,
        } => {
            if state.accepts(generation) {
                state.fail_session(message);
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
