use std::sync::{Arc, Mutex};
use std::time::Duration;

use scout_engine::{
    EngineEvent, FailureKind, PayloadSink, ReqwestSearchStreamer, SearchSettings, SearchStreamer,
};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn payloads(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::Payload { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }
}

impl PayloadSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn streamer_for(server: &MockServer) -> ReqwestSearchStreamer {
    ReqwestSearchStreamer::new(SearchSettings {
        api_url: server.uri(),
        ..SearchSettings::default()
    })
}

fn body() -> serde_json::Value {
    json!({
        "keywords": "AI Engineer",
        "location": "San Francisco",
        "job_boards": ["linkedin", "indeed"],
    })
}

#[tokio::test]
async fn streams_payloads_until_sentinel() {
    let server = MockServer::start().await;
    let sse = concat!(
        "data: {\"board\":\"linkedin\",\"status\":\"pending\",\"message\":\"Queued...\"}\n\n",
        "data: {\"board\":\"indeed\",\"status\":\"pending\",\"message\":\"Queued...\"}\n\n",
        "data: {\"board\":\"linkedin\",\"status\":\"completed\",\"jobs\":[]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(header("content-type", "application/json"))
        .and(body_json(body()))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let summary = streamer_for(&server)
        .stream(3, &body(), &sink, &CancellationToken::new())
        .await
        .expect("stream ok");

    assert_eq!(summary.payloads, 3);
    assert!(summary.saw_sentinel);
    assert_eq!(summary.discarded_tail, 0);
    assert_eq!(summary.bytes, sse.len() as u64);

    let payloads = sink.payloads();
    assert_eq!(payloads.len(), 3);
    assert!(payloads[0].contains("linkedin"));
    assert!(payloads[2].contains("completed"));
    let events = sink.events.lock().unwrap();
    assert!(events
        .iter()
        .all(|event| matches!(event, EngineEvent::Payload { generation: 3, .. })));
}

#[tokio::test]
async fn stream_closing_mid_frame_drops_the_tail() {
    let server = MockServer::start().await;
    let sse = "data: {\"board\":\"indeed\",\"status\":\"running\"}\n\ndata: {\"board\":\"ind";
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let summary = streamer_for(&server)
        .stream(1, &body(), &sink, &CancellationToken::new())
        .await
        .expect("stream ok");

    assert_eq!(summary.payloads, 1);
    assert!(!summary.saw_sentinel);
    assert_eq!(summary.discarded_tail, "data: {\"board\":\"ind".len());
    assert_eq!(sink.payloads().len(), 1);
}

#[tokio::test]
async fn non_success_status_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sink = TestSink::new();
    let err = streamer_for(&server)
        .stream(1, &body(), &sink, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.to_string(), "Search failed: 503");
    assert!(sink.payloads().is_empty());
}

#[tokio::test]
async fn request_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("data: {}\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let streamer = ReqwestSearchStreamer::new(SearchSettings {
        api_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..SearchSettings::default()
    });
    let sink = TestSink::new();
    let err = streamer
        .stream(1, &body(), &sink, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn cancellation_stops_a_pending_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_raw("data: {}\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let streamer = streamer_for(&server);
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let sink = TestSink::new();
    let err = streamer.stream(1, &body(), &sink, &token).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(sink.payloads().is_empty());
}

#[tokio::test]
async fn invalid_api_url_fails_before_sending() {
    let streamer = ReqwestSearchStreamer::new(SearchSettings {
        api_url: "::not-a-url::".to_string(),
        ..SearchSettings::default()
    });
    let sink = TestSink::new();
    let err = streamer
        .stream(1, &body(), &sink, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
