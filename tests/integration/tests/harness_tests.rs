//! Harness integration tests
//!
//! Every test spawns the in-process mock chat service, so no external
//! service is needed.
//!
//! Run with: cargo test -p integration-tests --test harness_tests

use std::time::Duration;

use harness_client::{
    AuthedRequest, ChatApi, ChatScenarios, ClientError, RequestHelper, SessionAcquirer, StatusCode,
};
use harness_common::{Endpoints, Identities};
use harness_runner::{Case, TestRunner};
use integration_tests::{test_timeouts, MockChatServer, TEST_PASSWORD};
use reqwest::Method;
use serde_json::{json, Value};

const CLOSE_GRACE: Duration = Duration::from_secs(2);

fn acquirer(endpoints: Endpoints) -> SessionAcquirer {
    let timeouts = test_timeouts();
    let requests = RequestHelper::new(timeouts.request).expect("Failed to build client");
    SessionAcquirer::new(endpoints, requests, timeouts.session)
}

fn owner_email() -> String {
    Identities::default().owner().email.clone()
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_acquire_session() {
    let server = MockChatServer::start().await.expect("Failed to start server");

    let session = acquirer(server.endpoints())
        .acquire(&owner_email(), TEST_PASSWORD)
        .await
        .expect("Session acquisition failed");

    assert!(!session.session.is_empty());
    assert!(!session.access_token.is_empty());
    assert_eq!(session.login.status.as_deref(), Some("success"));

    let cookie = session.cookie.clone().expect("Login set no cookies");
    assert!(cookie.contains("; logged_in=true"));
    assert_eq!(session.cookie_value("access_token"), Some(session.access_token.as_str()));
    assert_eq!(server.open_sockets(), 1);

    session.close().await;
    assert!(server.wait_for_sockets_closed(CLOSE_GRACE).await);
}

#[tokio::test]
async fn test_wrong_password_closes_socket() {
    let server = MockChatServer::start().await.expect("Failed to start server");

    let err = acquirer(server.endpoints())
        .acquire(&owner_email(), "not-the-password")
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(StatusCode::UNAUTHORIZED));
    assert!(err.to_string().contains("Invalid email or password"));
    assert!(server.wait_for_sockets_closed(CLOSE_GRACE).await);
    assert_eq!(server.state.issued_tokens(), 0);
}

#[tokio::test]
async fn test_silent_socket_times_out() {
    let server = MockChatServer::start().await.expect("Failed to start server");

    let err = acquirer(server.endpoints_with_ws("/ws/silent"))
        .acquire(&owner_email(), TEST_PASSWORD)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::SessionTimeout(d) if d == test_timeouts().session));
    assert!(server.wait_for_sockets_closed(CLOSE_GRACE).await);
}

#[tokio::test]
async fn test_non_json_frame_is_rejected() {
    let server = MockChatServer::start().await.expect("Failed to start server");

    let err = acquirer(server.endpoints_with_ws("/ws/garbage"))
        .acquire(&owner_email(), TEST_PASSWORD)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::MalformedFrame(_)));
    assert!(server.wait_for_sockets_closed(CLOSE_GRACE).await);
}

#[tokio::test]
async fn test_binary_session_frame_is_accepted() {
    let server = MockChatServer::start().await.expect("Failed to start server");

    let session = acquirer(server.endpoints_with_ws("/ws/binary"))
        .acquire(&owner_email(), TEST_PASSWORD)
        .await
        .expect("Session acquisition failed");

    assert!(!session.access_token.is_empty());
    session.close().await;
    assert!(server.wait_for_sockets_closed(CLOSE_GRACE).await);
}

#[tokio::test]
async fn test_unreachable_realtime_endpoint() {
    let server = MockChatServer::start().await.expect("Failed to start server");
    let endpoints = Endpoints::new(server.base_url(), "ws://127.0.0.1:1/ws");

    let err = acquirer(endpoints)
        .acquire(&owner_email(), TEST_PASSWORD)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::WebSocket(_)));
}

// ============================================================================
// Request Helper Tests
// ============================================================================

async fn echo(server: &MockChatServer, method: Method, body: Option<Value>) -> Value {
    let requests = RequestHelper::new(test_timeouts().request).unwrap();
    let response: Value = requests
        .send(AuthedRequest {
            token: "tok-1",
            session: Some("sess-1"),
            url: format!("{}/api/test/echo", server.base_url()),
            method,
            body,
        })
        .await
        .expect("Echo request failed");

    response["data"].clone()
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let server = MockChatServer::start().await.expect("Failed to start server");

    let echoed = echo(&server, Method::POST, Some(json!({ "content": "hi" }))).await;

    assert_eq!(echoed["method"], "POST");
    assert_eq!(echoed["authorization"], "Bearer tok-1");
    assert_eq!(echoed["session"], "sess-1");
    assert_eq!(echoed["content_type"], "application/json");
    let body: Value = serde_json::from_str(echoed["body"].as_str().unwrap()).unwrap();
    assert_eq!(body, json!({ "content": "hi" }));
}

#[tokio::test]
async fn test_get_and_delete_send_no_body() {
    let server = MockChatServer::start().await.expect("Failed to start server");

    for method in [Method::GET, Method::DELETE] {
        let echoed = echo(&server, method.clone(), Some(json!({ "ignored": true }))).await;

        assert_eq!(echoed["method"], method.as_str());
        assert_eq!(echoed["authorization"], "Bearer tok-1");
        assert!(echoed["content_type"].is_null());
        assert_eq!(echoed["body"], "");
    }
}

#[tokio::test]
async fn test_http_error_carries_server_message() {
    let server = MockChatServer::start().await.expect("Failed to start server");
    let requests = RequestHelper::new(test_timeouts().request).unwrap();

    let err = requests
        .send::<Value>(AuthedRequest {
            token: "tok-1",
            session: None,
            url: format!("{}/api/test/fail", server.base_url()),
            method: Method::GET,
            body: None,
        })
        .await
        .unwrap_err();

    match &err {
        ClientError::Http { status, message, .. } => {
            assert_eq!(*status, StatusCode::IM_A_TEAPOT);
            assert_eq!(message, "Short and stout");
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert!(err.is_rejection());
    assert_eq!(err.server_body().unwrap()["status"], "fail");
}

// ============================================================================
// Scenario Tests
// ============================================================================

#[tokio::test]
async fn test_duplicate_room_is_rejected() {
    let server = MockChatServer::start().await.expect("Failed to start server");
    let config = server.config();
    let scenarios = ChatScenarios::new(&config).unwrap();
    let (owner, peer) = (config.identities.owner(), config.identities.peer());

    let created = scenarios.create_room(&owner.email, peer.user_id).await.unwrap();
    assert!(created.is_success());
    let room_id = created.into_data().unwrap().room.id;
    assert!(!room_id.is_empty());

    let err = scenarios
        .create_room(&peer.email, owner.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), Some(StatusCode::CONFLICT));
    assert_eq!(server.state.room_count(), 1);

    assert!(server.wait_for_sockets_closed(CLOSE_GRACE).await);
}

#[tokio::test]
async fn test_outsider_cannot_read_room() {
    let server = MockChatServer::start().await.expect("Failed to start server");
    let config = server.config();
    let scenarios = ChatScenarios::new(&config).unwrap();
    let ids = &config.identities;

    let room_id = scenarios
        .create_room(&ids.owner().email, ids.peer().user_id)
        .await
        .unwrap()
        .into_data()
        .unwrap()
        .room
        .id;

    let err = scenarios.room(&ids.outsider().email, &room_id).await.unwrap_err();
    assert_eq!(err.status_code(), Some(StatusCode::FORBIDDEN));

    let listing = scenarios.messages(&ids.owner().email, &room_id).await.unwrap();
    let messages = listing.into_data().unwrap().messages;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].extra["Content"], "Hi");
}

// ============================================================================
// Runner Tests
// ============================================================================

#[tokio::test]
async fn test_full_run_passes_against_compliant_service() {
    let server = MockChatServer::start().await.expect("Failed to start server");
    let config = server.config();
    let scenarios = ChatScenarios::new(&config).unwrap();

    let report = TestRunner::new(&scenarios, &config.identities).run().await;

    assert_eq!(report.results.len(), Case::ALL.len());
    for result in &report.results {
        assert!(
            result.outcome.is_passed(),
            "{} did not pass: {:?}",
            result.case,
            result.outcome
        );
    }
    assert!(report.is_success());
    assert!(server.wait_for_sockets_closed(CLOSE_GRACE).await);
}

#[tokio::test]
async fn test_run_against_unreachable_service_fails_cleanly() {
    let server = MockChatServer::start().await.expect("Failed to start server");
    let mut config = server.config();
    config.endpoints = Endpoints::new(server.base_url(), "ws://127.0.0.1:1/ws");
    let scenarios = ChatScenarios::new(&config).unwrap();

    let report = TestRunner::new(&scenarios, &config.identities).run().await;

    assert!(!report.is_success());
    assert!(report.outcome_of(Case::CreateRoom).unwrap().is_failed());
    assert!(report.outcome_of(Case::Unsubscribe).unwrap().is_skipped());
}
