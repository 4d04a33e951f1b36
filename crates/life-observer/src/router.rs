//! Axum router construction for the viewer and control API.
//!
//! Assembles all routes (REST, control, SSE and `WebSocket`) into a single
//! [`Router`] with CORS and request tracing enabled.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{control, handlers, sse, ws};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- HTML viewer
/// - `GET /api/board` -- current generation
/// - `GET /api/status` -- simulation status
/// - `POST /api/start` -- start the simulation
/// - `POST /api/stop` -- stop the simulation
/// - `GET /sse/board` -- server-sent generation stream
/// - `GET /ws/board` -- `WebSocket` generation stream
///
/// CORS allows any origin so the viewer can be served from elsewhere.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Viewer page
        .route("/", get(handlers::index))
        // REST API
        .route("/api/board", get(handlers::get_board))
        .route("/api/status", get(handlers::get_status))
        // Control
        .route("/api/start", post(control::start))
        .route("/api/stop", post(control::stop))
        // Streams
        .route("/sse/board", get(sse::sse_board))
        .route("/ws/board", get(ws::ws_board))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
