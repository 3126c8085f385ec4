//! Router-level tests for the webhook, trigger and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use confetti_core::webhook::{LinearSignatureVerifier, SIGNATURE_HEADER};
use confetti_web::registry::ConnectionId;
use confetti_web::state::AppState;
use confetti_web::create_router;
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tower::ServiceExt;

const SECRET: &str = "test-webhook-secret";
const TIMEOUT: Duration = Duration::from_secs(5);

fn verifier() -> LinearSignatureVerifier {
    LinearSignatureVerifier::new(SECRET).unwrap()
}

fn test_state() -> AppState {
    AppState::new(Arc::new(verifier()))
}

/// Register a fake connection and return the receiving end of its queue.
async fn attach(state: &AppState) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    state.registry.on_connect(ConnectionId::new(), tx).await;
    rx
}

fn signed_request(body: &Value) -> Request<Body> {
    let raw = serde_json::to_vec(body).unwrap();
    let signature = verifier().sign(&raw);
    Request::post("/confetti")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(raw))
        .unwrap()
}

fn completed_from(prior: &str) -> Value {
    json!({
        "action": "update",
        "type": "Issue",
        "data": { "title": "Write tests", "state": { "type": "completed", "name": "Done" } },
        "updatedFrom": { "type": prior },
        "webhookTimestamp": now_ms(),
    })
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_completed_transition_broadcasts_once() {
    let state = test_state();
    let mut rx = attach(&state).await;
    let app = create_router(state);

    let response = app.oneshot(signed_request(&completed_from("started"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "broadcast": true, "delivered": 1 }));

    assert_eq!(rx.recv().await.as_deref(), Some("confetti"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_already_completed_is_acknowledged_without_broadcast() {
    let state = test_state();
    let mut rx = attach(&state).await;
    let app = create_router(state);

    let response = app.oneshot(signed_request(&completed_from("completed"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "broadcast": false, "delivered": 0 }));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_flat_payload_broadcasts() {
    let state = test_state();
    let mut rx = attach(&state).await;
    let app = create_router(state);

    let payload = json!({
        "action": "update",
        "state": { "type": "completed" },
        "updatedFrom": { "type": "started" },
    });
    let response = app.oneshot(signed_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(rx.recv().await.as_deref(), Some("confetti"));
}

#[tokio::test]
async fn test_invalid_signature_is_unauthorized() {
    let state = test_state();
    let mut rx = attach(&state).await;
    let app = create_router(state);

    let raw = serde_json::to_vec(&completed_from("started")).unwrap();
    let forged = LinearSignatureVerifier::new("wrong-secret").unwrap().sign(&raw);
    let request = Request::post("/confetti")
        .header(SIGNATURE_HEADER, forged)
        .body(Body::from(raw))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_missing_signature_is_unauthorized() {
    let state = test_state();
    let mut rx = attach(&state).await;
    let app = create_router(state);

    let raw = serde_json::to_vec(&completed_from("started")).unwrap();
    let request = Request::post("/confetti").body(Body::from(raw)).unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_stale_delivery_is_unauthorized() {
    let state = test_state();
    let mut rx = attach(&state).await;
    let app = create_router(state);

    let mut payload = completed_from("started");
    payload["webhookTimestamp"] = json!(now_ms() - 10 * 60 * 1000);
    let response = app.oneshot(signed_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_router(test_state());
    let raw = b"{not json".to_vec();
    let signature = verifier().sign(&raw);
    let request = Request::post("/confetti")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(raw))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_previous_state_is_rejected() {
    let state = test_state();
    let mut rx = attach(&state).await;
    let app = create_router(state);

    let payload = json!({
        "action": "update",
        "type": "Issue",
        "data": { "state": { "type": "completed" } },
    });
    let response = app.oneshot(signed_request(&payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_trigger_broadcasts_to_every_connection() {
    let state = test_state();
    let mut receivers = Vec::new();
    for _ in 0..3 {
        receivers.push(attach(&state).await);
    }
    let app = create_router(state);

    let response = app
        .oneshot(Request::post("/trigger").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    for rx in &mut receivers {
        assert_eq!(rx.recv().await.as_deref(), Some("confetti"));
    }
}

#[tokio::test]
async fn test_trigger_with_no_clients_succeeds() {
    let app = create_router(test_state());
    let response = app
        .oneshot(Request::get("/trigger").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = create_router(test_state());
    let response = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_websocket_clients_receive_marker_and_are_removed_on_close() {
    let state = test_state();
    let app = create_router(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let url = format!("ws://{addr}/ws");
    let (mut first, _) = tokio_tungstenite::connect_async(&url).await.unwrap();
    let (mut second, _) = tokio_tungstenite::connect_async(&url).await.unwrap();

    wait_for_connections(&state, 2).await;
    assert_eq!(state.broadcast().await, 2);

    for ws in [&mut first, &mut second] {
        let msg = timeout(TIMEOUT, ws.next()).await.unwrap().unwrap().unwrap();
        assert_eq!(msg, Message::text("confetti"));
    }

    first.close(None).await.unwrap();
    wait_for_connections(&state, 1).await;
    assert_eq!(state.broadcast().await, 1);
}

async fn wait_for_connections(state: &AppState, expected: usize) {
    timeout(TIMEOUT, async {
        while state.registry.len().await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("registry did not reach expected size");
}
