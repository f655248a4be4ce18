use std::sync::Arc;
use std::time::Duration;

use scout_core::{update, AppState, AppViewModel, Msg, SearchRequest};
use scout_engine::SearchSettings;

use crate::effects::EffectRunner;

/// Owns one search session at a time and publishes a snapshot after every
/// change. All state transitions go through [`update`] on the caller's thread.
pub struct SearchController {
    state: AppState,
    runner: EffectRunner,
    snapshot: Arc<AppViewModel>,
}

impl SearchController {
    pub fn new(settings: SearchSettings) -> Self {
        Self::with_runner(EffectRunner::new(settings))
    }

    pub fn with_runner(runner: EffectRunner) -> Self {
        let state = AppState::new();
        let snapshot = Arc::new(state.view());
        Self {
            state,
            runner,
            snapshot,
        }
    }

    pub fn start_search(&mut self, request: SearchRequest) {
        self.dispatch(Msg::SearchSubmitted(request));
    }

    pub fn reset(&mut self) {
        self.dispatch(Msg::ResetClicked);
    }

    /// Applies every engine event already received. Returns whether the
    /// snapshot changed.
    pub fn pump(&mut self) -> bool {
        let mut changed = false;
        while let Some(msg) = self.runner.try_next() {
            changed |= self.dispatch(msg);
        }
        changed
    }

    /// Waits up to `timeout` for engine activity, then drains what arrived.
    pub fn wait_for_event(&mut self, timeout: Duration) -> bool {
        match self.runner.next_timeout(timeout) {
            Some(msg) => {
                let changed = self.dispatch(msg);
                self.pump() || changed
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> Arc<AppViewModel> {
        Arc::clone(&self.snapshot)
    }

    pub fn is_searching(&self) -> bool {
        self.state.session().is_in_flight()
    }

    fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        if changed {
            self.snapshot = Arc::new(state.view());
        }
        self.state = state;
        self.runner.enqueue(effects);
        changed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use pretty_assertions::assert_eq;
    use scout_core::{AgentStatus, SearchRequest, SessionPhase, Source};
    use scout_engine::{
        EngineEvent, EngineHandle, FailureKind, Generation, PayloadSink, SearchSettings,
        SearchStreamer, StreamError, StreamSummary,
    };
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::SearchController;
    use crate::effects::EffectRunner;

    const SCENARIO: &str = concat!(
        "data: {\"board\":\"linkedin\",\"status\":\"pending\",\"message\":\"Queued...\"}\n\n",
        "data: {\"board\":\"indeed\",\"status\":\"pending\",\"message\":\"Queued...\"}\n\n",
        "data: {\"board\":\"linkedin\",\"status\":\"running\"}\n\n",
        "data: {\"board\":\"linkedin\",\"status\":\"completed\",\"jobs\":[",
        "{\"title\":\"AI Engineer\",\"company\":\"Acme\",\"location\":\"SF\",\"url\":\"a\",\"source\":\"linkedin\"}",
        "]}\n\n",
        "data: {\"board\":\"indeed\",\"status\":\"completed\",\"jobs\":[",
        "{\"title\":\"AI Engineer\",\"company\":\"Acme\",\"location\":\"SF\",\"url\":\"a\",\"source\":\"indeed\"},",
        "{\"title\":\"ML Engineer\",\"company\":\"Beta\",\"location\":\"SF\",\"url\":\"b\",\"source\":\"indeed\"}",
        "]}\n\n",
        "data: [DONE]\n\n",
    );

    fn init_logging() {
        scout_logging::initialize_for_tests();
    }

    fn request() -> SearchRequest {
        SearchRequest::new("AI Engineer", "San Francisco", [Source::Linkedin, Source::Indeed])
            .unwrap()
    }

    fn run_until_idle(controller: &mut SearchController) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while controller.is_searching() {
            assert!(Instant::now() < deadline, "search did not finish in time");
            controller.wait_for_event(Duration::from_millis(50));
        }
    }

    async fn mock_search(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/api/search"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    fn settings_for(server: &MockServer) -> SearchSettings {
        SearchSettings {
            api_url: server.uri(),
            ..SearchSettings::default()
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn scenario_aggregates_and_dedupes_across_sources() {
        init_logging();
        let server = MockServer::start().await;
        mock_search(
            &server,
            ResponseTemplate::new(200).set_body_raw(SCENARIO, "text/event-stream"),
        )
        .await;
        let settings = settings_for(&server);

        let view = tokio::task::spawn_blocking(move || {
            let mut controller = SearchController::new(settings);
            controller.start_search(request());
            assert_eq!(controller.snapshot().phase, SessionPhase::Streaming);
            run_until_idle(&mut controller);
            controller.snapshot()
        })
        .await
        .unwrap();

        assert_eq!(view.phase, SessionPhase::Completed);
        let urls: Vec<&str> = view.jobs.iter().map(|job| job.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "b"]);
        assert_eq!(view.jobs[0].source, Source::Linkedin);
        assert_eq!(view.agents.len(), 2);
        assert!(view
            .agents
            .iter()
            .all(|agent| agent.status == AgentStatus::Completed));
        assert_eq!(view.summary.completed, 2);
        assert_eq!(view.error, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_fails_the_session() {
        init_logging();
        let server = MockServer::start().await;
        mock_search(&server, ResponseTemplate::new(500)).await;
        let settings = settings_for(&server);

        let view = tokio::task::spawn_blocking(move || {
            let mut controller = SearchController::new(settings);
            controller.start_search(request());
            run_until_idle(&mut controller);
            controller.snapshot()
        })
        .await
        .unwrap();

        assert_eq!(view.phase, SessionPhase::Failed);
        assert_eq!(view.error.as_deref(), Some("Search failed: 500"));
        assert!(view.jobs.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn reset_right_after_start_ignores_the_old_stream() {
        init_logging();
        let server = MockServer::start().await;
        mock_search(
            &server,
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(100))
                .set_body_raw(SCENARIO, "text/event-stream"),
        )
        .await;
        let settings = settings_for(&server);

        let view = tokio::task::spawn_blocking(move || {
            let mut controller = SearchController::new(settings);
            controller.start_search(request());
            controller.reset();
            let deadline = Instant::now() + Duration::from_millis(400);
            while Instant::now() < deadline {
                controller.wait_for_event(Duration::from_millis(50));
            }
            assert!(!controller.is_searching());
            controller.snapshot()
        })
        .await
        .unwrap();

        assert_eq!(view.phase, SessionPhase::Idle);
        assert!(view.jobs.is_empty());
        assert!(view.agents.is_empty());
        assert_eq!(view.error, None);
    }

    /// Emits a fixed list of payloads, then fails like a dropped connection.
    struct BrokenStreamer {
        payloads: Vec<&'static str>,
    }

    #[async_trait::async_trait]
    impl SearchStreamer for BrokenStreamer {
        async fn stream(
            &self,
            generation: Generation,
            _body: &Value,
            sink: &dyn PayloadSink,
            _cancel: &CancellationToken,
        ) -> Result<StreamSummary, StreamError> {
            for payload in &self.payloads {
                sink.emit(EngineEvent::Payload {
                    generation,
                    payload: payload.to_string(),
                });
            }
            Err(StreamError::new(FailureKind::Network, "connection reset"))
        }
    }

    #[test]
    fn transport_failure_after_one_event_keeps_partial_results() {
        init_logging();
        let streamer = BrokenStreamer {
            payloads: vec![
                r#"{"board":"linkedin","status":"completed","jobs":[{"title":"t","company":"c","location":"l","url":"a","source":"linkedin"}]}"#,
            ],
        };
        let runner = EffectRunner::with_engine(EngineHandle::with_streamer(Arc::new(streamer)));
        let mut controller = SearchController::with_runner(runner);

        controller.start_search(request());
        run_until_idle(&mut controller);
        let view = controller.snapshot();

        assert_eq!(view.phase, SessionPhase::Failed);
        assert_eq!(view.error.as_deref(), Some("connection reset"));
        assert_eq!(view.summary.jobs_found, 1);
        assert_eq!(view.agents[0].status, AgentStatus::Completed);
        assert_eq!(view.agents[1].status, AgentStatus::Pending);
    }

    struct PanickingStreamer;

    #[async_trait::async_trait]
    impl SearchStreamer for PanickingStreamer {
        async fn stream(
            &self,
            _generation: Generation,
            _body: &Value,
            _sink: &dyn PayloadSink,
            _cancel: &CancellationToken,
        ) -> Result<StreamSummary, StreamError> {
            panic!("streamer bug");
        }
    }

    #[test]
    fn panicking_streamer_fails_the_session_instead_of_hanging() {
        init_logging();
        let runner =
            EffectRunner::with_engine(EngineHandle::with_streamer(Arc::new(PanickingStreamer)));
        let mut controller = SearchController::with_runner(runner);

        controller.start_search(request());
        run_until_idle(&mut controller);
        let view = controller.snapshot();

        assert_eq!(view.phase, SessionPhase::Failed);
        assert!(view
            .error
            .as_deref()
            .is_some_and(|error| error.starts_with("search task failed")));
    }

    #[test]
    fn snapshots_are_immutable_once_published() {
        init_logging();
        let streamer = BrokenStreamer { payloads: vec![] };
        let runner = EffectRunner::with_engine(EngineHandle::with_streamer(Arc::new(streamer)));
        let mut controller = SearchController::with_runner(runner);

        let idle = controller.snapshot();
        controller.start_search(request());
        let streaming = controller.snapshot();
        run_until_idle(&mut controller);

        assert_eq!(idle.phase, SessionPhase::Idle);
        assert_eq!(streaming.phase, SessionPhase::Streaming);
        assert_eq!(controller.snapshot().phase, SessionPhase::Failed);
    }
}
