//! Integration tests for the viewer and control API.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. This validates handler logic and routing
//! without needing a live network connection.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::StreamExt as _;
use life_core::{BoardBroadcaster, Simulation};
use life_observer::BoardFrame;
use life_observer::router::build_router;
use life_observer::state::AppState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;
use tower::ServiceExt;

const SIZE: usize = 8;

fn make_test_state() -> Arc<AppState> {
    let simulation = Simulation::new(SIZE, StdRng::seed_from_u64(17)).unwrap();
    Arc::new(AppState::new(
        Arc::new(simulation),
        BoardBroadcaster::new(8),
        Duration::from_millis(200),
    ))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::post(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

async fn get_json(state: &Arc<AppState>, path: &str) -> (StatusCode, Value) {
    let response = build_router(Arc::clone(state))
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_index_returns_html() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.contains("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("/sse/board"));
    assert!(html.contains("8x8"));
}

#[tokio::test]
async fn test_get_board_initially_dead() {
    let state = make_test_state();
    let (status, json) = get_json(&state, "/api/board").await;

    assert_eq!(status, StatusCode::OK);
    let frame: BoardFrame = serde_json::from_value(json).unwrap();
    assert_eq!(frame.run, 0);
    assert_eq!(frame.generation, 0);
    assert_eq!(frame.size, SIZE);
    assert_eq!(frame.live, 0);
    assert_eq!(frame.rows.len(), SIZE);
    assert!(frame.rows.iter().all(|row| row == "........"));
}

#[tokio::test]
async fn test_get_status_initial() {
    let state = make_test_state();
    let (status, json) = get_json(&state, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["running"], false);
    assert_eq!(json["run"], 0);
    assert_eq!(json["generation"], 0);
    assert_eq!(json["board_size"], SIZE);
    assert_eq!(json["subscribers"], 0);
    assert_eq!(json["tick_interval_ms"], 200);
    assert_eq!(json["broadcast_capacity"], 8);
    assert!(json["started_at"].is_string());
}

#[tokio::test]
async fn test_start_reseeds_and_is_idempotent() {
    let state = make_test_state();

    let (status, json) = post(&state, "/api/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["running"], true);
    assert_eq!(json["changed"], true);
    assert!(state.simulation.is_running());

    let seeded = state.simulation.snapshot();
    assert_eq!(seeded.run, 1);

    let (status, json) = post(&state, "/api/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["running"], true);
    assert_eq!(json["changed"], false);
    assert_eq!(state.simulation.snapshot(), seeded);

    let (_, board) = get_json(&state, "/api/board").await;
    let frame: BoardFrame = serde_json::from_value(board).unwrap();
    assert_eq!(frame.run, 1);
    assert_eq!(
        frame.live,
        u64::try_from(seeded.board.live_count()).unwrap()
    );
}

#[tokio::test]
async fn test_stop_is_idempotent() {
    let state = make_test_state();

    let (status, json) = post(&state, "/api/stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["running"], false);
    assert_eq!(json["changed"], false);

    let _ = post(&state, "/api/start").await;
    let (_, json) = post(&state, "/api/stop").await;
    assert_eq!(json["running"], false);
    assert_eq!(json["changed"], true);
    assert!(!state.simulation.is_running());

    let (_, status) = get_json(&state, "/api/status").await;
    assert_eq!(status["running"], false);
    assert_eq!(status["run"], 1);
}

#[tokio::test]
async fn test_control_requires_post() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(Request::get("/api/start").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_sse_streams_published_generations() {
    let state = make_test_state();
    let router = build_router(Arc::clone(&state));

    let response = router
        .oneshot(Request::get("/sse/board").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/event-stream"));
    assert_eq!(state.broadcaster.subscriber_count(), 1);

    state.simulation.start();
    let generation = state.simulation.tick().unwrap();
    assert_eq!(state.broadcaster.publish(&generation), 1);

    let mut body = response.into_body().into_data_stream();
    let chunk = body.next().await.unwrap().unwrap();
    let text = String::from_utf8(chunk.to_vec()).unwrap();

    assert!(text.starts_with("event: board\n"));
    let data = text
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    let frame: BoardFrame = serde_json::from_str(data).unwrap();
    assert_eq!(frame, BoardFrame::from(&generation));

    drop(body);
    assert_eq!(state.broadcaster.subscriber_count(), 0);
}

#[tokio::test]
async fn test_sse_stream_ends_on_shutdown() {
    let state = make_test_state();

    let response = build_router(Arc::clone(&state))
        .oneshot(Request::get("/sse/board").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(state.broadcaster.subscriber_count(), 1);

    state.trigger_shutdown();

    let mut body = response.into_body().into_data_stream();
    let end = tokio::time::timeout(Duration::from_secs(2), body.next())
        .await
        .unwrap();
    assert!(end.is_none());
    drop(body);
    assert_eq!(state.broadcaster.subscriber_count(), 0);
}

#[tokio::test]
async fn test_sse_opened_after_shutdown_ends_immediately() {
    let state = make_test_state();
    state.trigger_shutdown();

    let response = build_router(Arc::clone(&state))
        .oneshot(Request::get("/sse/board").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let mut body = response.into_body().into_data_stream();
    let end = tokio::time::timeout(Duration::from_secs(2), body.next())
        .await
        .unwrap();
    assert!(end.is_none());
}

#[tokio::test]
async fn test_status_counts_stream_viewers() {
    let state = make_test_state();

    let first = build_router(Arc::clone(&state))
        .oneshot(Request::get("/sse/board").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let second = build_router(Arc::clone(&state))
        .oneshot(Request::get("/sse/board").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let (_, json) = get_json(&state, "/api/status").await;
    assert_eq!(json["subscribers"], 2);

    drop(first);
    drop(second);
    let (_, json) = get_json(&state, "/api/status").await;
    assert_eq!(json["subscribers"], 0);
}

#[tokio::test]
async fn test_nonexistent_route_returns_404() {
    let state = make_test_state();
    let router = build_router(state);

    let response = router
        .oneshot(
            Request::get("/api/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
