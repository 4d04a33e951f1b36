//! Control endpoints for starting and stopping the simulation.
//!
//! Both endpoints are idempotent: repeating a request reports the current
//! state with `ok: true` and changes nothing. Neither waits for a tick.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/start` | Reseed the board and start stepping |
//! | `POST` | `/api/stop` | Stop stepping, keep the board |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use life_core::RunTransition;
use tracing::info;

use crate::state::AppState;

/// Response body for the control endpoints.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ControlResponse {
    /// Whether the request was accepted. Always true.
    pub ok: bool,
    /// Running flag after the request.
    pub running: bool,
    /// Whether the request changed the running flag.
    pub changed: bool,
    /// Human-readable message.
    pub message: String,
}

impl From<RunTransition> for ControlResponse {
    fn from(transition: RunTransition) -> Self {
        let message = match transition {
            RunTransition::Started => "Simulation started with a fresh board",
            RunTransition::AlreadyRunning => "Simulation already running",
            RunTransition::Stopped => "Simulation stopped",
            RunTransition::AlreadyStopped => "Simulation already stopped",
        };
        Self {
            ok: true,
            running: transition.running(),
            changed: transition.changed(),
            message: message.to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// POST /api/start
// ---------------------------------------------------------------------------

/// Start the simulation.
///
/// From Idle this reseeds the board and begins a new run; while already
/// running it is a no-op.
pub async fn start(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    let transition = state.simulation.start();
    info!(?transition, "Start requested");
    Json(ControlResponse::from(transition))
}

// ---------------------------------------------------------------------------
// POST /api/stop
// ---------------------------------------------------------------------------

/// Stop the simulation.
///
/// A generation already being stepped when the request arrives may still
/// be published; nothing after it is.
pub async fn stop(State(state): State<Arc<AppState>>) -> Json<ControlResponse> {
    let transition = state.simulation.stop();
    info!(?transition, "Stop requested");
    Json(ControlResponse::from(transition))
}
