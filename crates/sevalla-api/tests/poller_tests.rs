//! Operation polling against a mocked API

use serde_json::json;
use sevalla_api::{
    CancelHandle, CancelToken, ClientConfig, OperationStatus, PollConfig, PollEvent,
    SevallaClient, SevallaError, wait_for_operation,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn client_for(server: &MockServer) -> SevallaClient {
    SevallaClient::new(ClientConfig::new("test-token").with_base_url(server.uri())).unwrap()
}

fn fast() -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    }
}

struct Sequence {
    responses: Vec<ResponseTemplate>,
    calls: AtomicUsize,
}

impl Respond for Sequence {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses[call.min(self.responses.len() - 1)].clone()
    }
}

fn status(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount_statuses(server: &MockServer, id: &str, responses: Vec<ResponseTemplate>) {
    Mock::given(method("GET"))
        .and(path(format!("/operations/{id}")))
        .respond_with(Sequence {
            responses,
            calls: AtomicUsize::new(0),
        })
        .mount(server)
        .await;
}

async fn poll_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

#[tokio::test]
async fn completed_operation_yields_resource_id() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_1",
        vec![
            status(json!({"id": "op_1", "status": "PENDING"})),
            status(json!({"id": "op_1", "status": "RUNNING", "progress": 40})),
            status(json!({"id": "op_1", "status": "COMPLETED", "resource_id": "site_42"})),
        ],
    )
    .await;

    let id = wait_for_operation(
        &client_for(&server),
        "op_1",
        &fast(),
        &CancelToken::never(),
        None,
    )
    .await
    .unwrap();
    assert_eq!(id, "site_42");
    assert_eq!(poll_count(&server).await, 3);
}

#[tokio::test]
async fn completed_without_resource_id_uses_site_id() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_2",
        vec![status(json!({
            "id": "op_2",
            "status": "COMPLETED",
            "data": {"site_id": "site_7"}
        }))],
    )
    .await;

    let id = wait_for_operation(
        &client_for(&server),
        "op_2",
        &fast(),
        &CancelToken::never(),
        None,
    )
    .await
    .unwrap();
    assert_eq!(id, "site_7");
}

#[tokio::test]
async fn completed_without_any_id_is_error() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_3",
        vec![status(json!({"id": "op_3", "status": "COMPLETED"}))],
    )
    .await;

    let err = wait_for_operation(
        &client_for(&server),
        "op_3",
        &fast(),
        &CancelToken::never(),
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SevallaError::MissingResourceId(ref id) if id == "op_3"));
}

#[tokio::test]
async fn failed_operation_reports_error_text() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_4",
        vec![
            status(json!({"id": "op_4", "status": "RUNNING"})),
            status(json!({"id": "op_4", "status": "FAILED", "error": "quota exceeded"})),
        ],
    )
    .await;

    let err = wait_for_operation(
        &client_for(&server),
        "op_4",
        &fast(),
        &CancelToken::never(),
        None,
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("quota exceeded"), "got {err}");
}

#[tokio::test]
async fn failed_operation_without_detail() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_5",
        vec![status(json!({"id": "op_5", "status": "FAILED", "error": ""}))],
    )
    .await;

    let err = wait_for_operation(
        &client_for(&server),
        "op_5",
        &fast(),
        &CancelToken::never(),
        None,
    )
    .await
    .unwrap_err();
    assert!(
        err.to_string().contains("failed with unknown error"),
        "got {err}"
    );
}

#[tokio::test]
async fn status_lookup_failure_ends_wait() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_6",
        vec![ResponseTemplate::new(404).set_body_json(json!({"message": "Operation not found"}))],
    )
    .await;

    let err = wait_for_operation(
        &client_for(&server),
        "op_6",
        &fast(),
        &CancelToken::never(),
        None,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SevallaError::OperationStatus { .. }), "got {err:?}");
    assert!(err.to_string().contains("Operation not found"));
    assert_eq!(poll_count(&server).await, 1);
}

#[tokio::test]
async fn never_terminal_operation_times_out() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_7",
        vec![status(json!({"id": "op_7", "status": "RUNNING"}))],
    )
    .await;

    let config = PollConfig {
        interval: Duration::from_millis(20),
        timeout: Duration::from_millis(100),
    };
    let err = wait_for_operation(
        &client_for(&server),
        "op_7",
        &config,
        &CancelToken::never(),
        None,
    )
    .await
    .unwrap_err();
    assert!(err.is_timeout(), "got {err:?}");

    let polls = poll_count(&server).await;
    assert!(polls >= 1);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(poll_count(&server).await, polls);
}

#[tokio::test]
async fn cancellation_interrupts_wait() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_8",
        vec![status(json!({"id": "op_8", "status": "PENDING"}))],
    )
    .await;

    let client = client_for(&server);
    let handle = CancelHandle::new();
    let token = handle.token();
    let config = PollConfig {
        interval: Duration::from_millis(20),
        timeout: Duration::from_secs(60),
    };

    let wait = tokio::spawn(async move {
        wait_for_operation(&client, "op_8", &config, &token, None).await
    });
    tokio::time::sleep(Duration::from_millis(70)).await;
    handle.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), wait)
        .await
        .expect("cancelled wait should return promptly")
        .unwrap();
    assert!(result.unwrap_err().is_cancelled());

    let polls = poll_count(&server).await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(poll_count(&server).await, polls);
}

#[tokio::test]
async fn progress_events_are_emitted() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_9",
        vec![
            status(json!({"id": "op_9", "status": "RUNNING", "progress": 50})),
            status(json!({"id": "op_9", "status": "COMPLETED", "resource_id": "site_42", "progress": 100})),
        ],
    )
    .await;

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    wait_for_operation(
        &client_for(&server),
        "op_9",
        &fast(),
        &CancelToken::never(),
        Some(Box::new(move |event| sink.lock().unwrap().push(event))),
    )
    .await
    .unwrap();

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], PollEvent::Started { .. }));
    assert!(matches!(
        events[1],
        PollEvent::Polling {
            status: OperationStatus::Running,
            progress: 50,
            ..
        }
    ));
    assert!(matches!(
        events[2],
        PollEvent::Polling {
            status: OperationStatus::Completed,
            ..
        }
    ));
    assert_eq!(
        events[3],
        PollEvent::Completed {
            operation_id: "op_9".to_string(),
            resource_id: "site_42".to_string(),
        }
    );
}

#[tokio::test]
async fn failure_emits_failed_event() {
    let server = MockServer::start().await;
    mount_statuses(
        &server,
        "op_10",
        vec![status(json!({"id": "op_10", "status": "FAILED", "error": "disk full"}))],
    )
    .await;

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let _ = wait_for_operation(
        &client_for(&server),
        "op_10",
        &fast(),
        &CancelToken::never(),
        Some(Box::new(move |event| sink.lock().unwrap().push(event))),
    )
    .await;

    let events = events.lock().unwrap();
    match events.last() {
        Some(PollEvent::Failed { error, .. }) => assert!(error.contains("disk full")),
        other => panic!("expected failure event, got {other:?}"),
    }
}
