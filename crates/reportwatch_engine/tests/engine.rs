use std::sync::{mpsc, Arc};
use std::time::Duration;

use pretty_assertions::assert_eq;
use reportwatch_engine::{
    ChannelEventSink, ClientSettings, EngineError, EngineEvent, EngineHandle, FailureKind,
    RemoteStatus,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> ClientSettings {
    ClientSettings {
        base_url: server.uri(),
        poll_interval: Duration::from_millis(30),
        ..ClientSettings::default()
    }
}

fn recv(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("engine event")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submit_then_poll_to_completion() {
    reportwatch_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate-report"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "job_id": "abc" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/report-status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "complete",
            "result": "https://reports.example/abc"
        })))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(&settings(&server), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine");

    engine.submit("https://example.com");
    assert_eq!(
        recv(&rx),
        EngineEvent::SubmitCompleted {
            result: Ok("abc".to_string())
        }
    );

    engine.start_polling("abc");
    match recv(&rx) {
        EngineEvent::StatusChecked {
            job_id,
            result: Ok(report),
        } => {
            assert_eq!(job_id, "abc");
            assert_eq!(report.remote_status(), RemoteStatus::Complete);
            assert_eq!(report.result, "https://reports.example/abc");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(
        recv(&rx),
        EngineEvent::PollingStopped {
            job_id: "abc".to_string()
        }
    );

    drop(engine);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn submit_error_is_reported_as_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate-report"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(&settings(&server), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine");
    engine.submit("https://example.com");

    match recv(&rx) {
        EngineEvent::SubmitCompleted { result: Err(err) } => {
            assert_eq!(err.kind, FailureKind::HttpStatus(500));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stop_polling_and_drop_end_the_loop() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/report-status/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "fetching_data" })))
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::new(&settings(&server), Arc::new(ChannelEventSink::new(tx)))
        .expect("engine");
    engine.start_polling("abc");
    assert!(matches!(recv(&rx), EngineEvent::StatusChecked { .. }));

    engine.stop_polling();
    loop {
        if matches!(recv(&rx), EngineEvent::PollingStopped { .. }) {
            break;
        }
    }
    drop(engine);

    let seen = server.received_requests().await.unwrap_or_default().len();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(server.received_requests().await.unwrap_or_default().len(), seen);
}

#[test]
fn invalid_base_url_fails_to_start() {
    let (tx, _rx) = mpsc::channel();
    let settings = ClientSettings {
        base_url: "localhost".to_string(),
        ..ClientSettings::default()
    };
    let err = EngineHandle::new(&settings, Arc::new(ChannelEventSink::new(tx))).err();
    match err {
        Some(EngineError::Client(err)) => assert_eq!(err.kind, FailureKind::InvalidUrl),
        other => panic!("unexpected result {other:?}"),
    }
}
