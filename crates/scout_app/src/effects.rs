use std::time::Duration;

use scout_core::{Effect, Generation, Msg};
use scout_engine::{EngineEvent, EngineHandle, EngineStopped, SearchSettings};
use scout_logging::{scout_debug, scout_error, scout_info};

/// Executes core effects on the engine and turns engine events back into
/// messages.
pub struct EffectRunner {
    engine: EngineHandle,
    /// Stream opened and not yet closed or cancelled.
    open: Option<Generation>,
}

impl EffectRunner {
    pub fn new(settings: SearchSettings) -> Self {
        Self::with_engine(EngineHandle::new(settings))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine, open: None }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenStream {
                    generation,
                    request,
                } => {
                    scout_info!(
                        "OpenStream generation={} boards={}",
                        generation,
                        request.job_boards().len()
                    );
                    self.open = Some(generation);
                    // A dead engine is reported by the next poll.
                    if let Err(err) = self.engine.start(generation, request.to_json()) {
                        scout_error!("Search {} not started: {}", generation, err);
                    }
                }
                Effect::CancelStream { generation } => {
                    if self.open == Some(generation) {
                        self.open = None;
                    }
                    let _ = self.engine.cancel(generation);
                }
            }
        }
    }

    pub fn try_next(&mut self) -> Option<Msg> {
        loop {
            match self.engine.try_recv() {
                Ok(Some(event)) => {
                    if let Some(msg) = self.observe(event) {
                        return Some(msg);
                    }
                }
                Ok(None) => return None,
                Err(stopped) => return self.engine_stopped(stopped),
            }
        }
    }

    /// Blocks up to `timeout` for the next message.
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<Msg> {
        match self.engine.recv_timeout(timeout) {
            Ok(Some(event)) => self.observe(event).or_else(|| self.try_next()),
            Ok(None) => None,
            Err(stopped) => self.engine_stopped(stopped),
        }
    }

    fn observe(&mut self, event: EngineEvent) -> Option<Msg> {
        if let EngineEvent::StreamClosed { generation, .. } = &event {
            if self.open == Some(*generation) {
                self.open = None;
            }
        }
        map_event(event)
    }

    /// The open stream can no longer close on its own; fail it once.
    fn engine_stopped(&mut self, stopped: EngineStopped) -> Option<Msg> {
        let generation = self.open.take()?;
        scout_error!("Search {} lost: {}", generation, stopped);
        Some(Msg::StreamFailed {
            generation,
            message: stopped.to_string(),
        })
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Payload {
            generation,
            payload,
        } => Some(Msg::StreamPayload {
            generation,
            payload,
        }),
        EngineEvent::StreamClosed {
            generation,
            result: Ok(_),
        } => Some(Msg::StreamFinished { generation }),
        EngineEvent::StreamClosed {
            generation,
            result: Err(err),
        } if err.is_cancelled() => {
            scout_debug!("Search {} cancelled", generation);
            None
        }
        EngineEvent::StreamClosed {
            generation,
            result: Err(err),
        } => Some(Msg::StreamFailed {
            generation,
            message: err.to_string(),
        }),
    }
}
