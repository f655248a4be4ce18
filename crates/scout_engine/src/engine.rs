use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use scout_logging::{scout_debug, scout_error, scout_warn};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::stream::{ChannelPayloadSink, ReqwestSearchStreamer, SearchSettings, SearchStreamer};
use crate::{EngineEvent, EngineStopped, FailureKind, Generation, StreamError};

enum EngineCommand {
    Start { generation: Generation, body: Value },
    Cancel { generation: Generation },
    Shutdown,
}

/// Runs search streams on a background Tokio runtime.
///
/// At most one stream is live: starting a new one cancels the previous.
/// Once the engine thread is gone every call reports [`EngineStopped`].
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SearchSettings) -> Self {
        Self::with_streamer(Arc::new(ReqwestSearchStreamer::new(settings)))
    }

    pub fn with_streamer(streamer: Arc<dyn SearchStreamer>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    scout_error!("Failed to start search runtime: {}", err);
                    return;
                }
            };

            let mut live: Option<(Generation, CancellationToken)> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Start { generation, body } => {
                        if let Some((previous, token)) = live.take() {
                            scout_debug!("Search {} superseded by {}", previous, generation);
                            token.cancel();
                        }
                        let token = CancellationToken::new();
                        live = Some((generation, token.clone()));

                        let streamer = streamer.clone();
                        let event_tx = event_tx.clone();
                        let sink = ChannelPayloadSink::new(event_tx.clone());
                        let task = runtime.spawn(async move {
                            streamer.stream(generation, &body, &sink, &token).await
                        });
                        runtime.spawn(async move {
                            let result = task.await.unwrap_or_else(|err| {
                                scout_error!("Search {} task died: {}", generation, err);
                                Err(StreamError::new(
                                    FailureKind::Internal,
                                    format!("search task failed: {err}"),
                                ))
                            });
                            if let Err(err) = &result {
                                if !err.is_cancelled() {
                                    scout_warn!("Search {} stream failed: {}", generation, err);
                                }
                            }
                            let _ = event_tx.send(EngineEvent::StreamClosed { generation, result });
                        });
                    }
                    EngineCommand::Cancel { generation } => match live.take() {
                        Some((current, token)) if current == generation => {
                            scout_debug!("Cancelling search {}", generation);
                            token.cancel();
                        }
                        other => live = other,
                    },
                    EngineCommand::Shutdown => {
                        scout_debug!("Search engine shutting down");
                        break;
                    }
                }
            }
            // Refuse commands before the event channel disconnects.
            drop(cmd_rx);
        });

        Self { cmd_tx, event_rx }
    }

    pub fn start(&self, generation: Generation, body: Value) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Start { generation, body })
    }

    pub fn cancel(&self, generation: Generation) -> Result<(), EngineStopped> {
        self.send(EngineCommand::Cancel { generation })
    }

    /// Stops the engine thread. Streams still running are dropped without a
    /// close event.
    pub fn shutdown(&self) {
        let _ = self.send(EngineCommand::Shutdown);
    }

    pub fn try_recv(&self) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(EngineStopped),
        }
    }

    /// Blocks up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }

    fn send(&self, command: EngineCommand) -> Result<(), EngineStopped> {
        self.cmd_tx.send(command).map_err(|_| EngineStopped)
    }
}
