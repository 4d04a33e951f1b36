//! REST endpoint handlers and the HTML viewer page.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML viewer driven by `/sse/board` |
//! | `GET` | `/api/board` | Current generation as a [`BoardFrame`] |
//! | `GET` | `/api/status` | Simulation and channel status |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use chrono::Utc;
use life_core::SimulationStatus;

use crate::error::ObserverError;
use crate::frame::BoardFrame;
use crate::state::AppState;

/// Response body for `GET /api/status`.
#[derive(Debug, serde::Serialize)]
pub struct StatusResponse {
    /// Simulation state.
    #[serde(flatten)]
    pub simulation: SimulationStatus,
    /// Connected stream viewers.
    pub subscribers: usize,
    /// Per-viewer queue depth.
    pub broadcast_capacity: usize,
    /// Milliseconds between ticks.
    pub tick_interval_ms: u64,
    /// Seconds since the simulation was created.
    pub uptime_seconds: u64,
}

// ---------------------------------------------------------------------------
// GET / -- HTML viewer
// ---------------------------------------------------------------------------

/// Serve the viewer page.
///
/// The page subscribes to `/sse/board` and paints each frame onto a
/// canvas; the buttons call the control endpoints.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let size = state.simulation.size();
    let tick_ms = state.tick_interval_ms();
    let running = if state.simulation.is_running() {
        "RUNNING"
    } else {
        "STOPPED"
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Torus Life</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        button {{
            background: #161b22;
            color: #c9d1d9;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 0.5rem 1.25rem;
            margin-right: 0.5rem;
            cursor: pointer;
        }}
        button:hover {{ border-color: #58a6ff; }}
        canvas {{ border: 1px solid #30363d; margin-top: 1rem; image-rendering: pixelated; }}
        .status {{ color: #3fb950; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Torus Life</h1>
    <p class="subtitle">{size}x{size} toroidal board, one generation every {tick_ms} ms</p>

    <p>Status: <span class="status" id="status">{running}</span>
       &middot; Generation <span id="generation">-</span>
       &middot; Live <span id="live">-</span></p>

    <button onclick="control('start')">Start</button>
    <button onclick="control('stop')">Stop</button>

    <div><canvas id="board" width="600" height="600"></canvas></div>

    <script>
        const canvas = document.getElementById('board');
        const ctx = canvas.getContext('2d');

        function draw(frame) {{
            const cell = canvas.width / frame.size;
            ctx.fillStyle = '#0d1117';
            ctx.fillRect(0, 0, canvas.width, canvas.height);
            ctx.fillStyle = '#58a6ff';
            frame.rows.forEach((row, r) => {{
                for (let c = 0; c < row.length; c++) {{
                    if (row[c] === '#') ctx.fillRect(c * cell, r * cell, cell, cell);
                }}
            }});
            document.getElementById('generation').textContent = frame.run + '.' + frame.generation;
            document.getElementById('live').textContent = frame.live;
        }}

        async function control(action) {{
            const res = await fetch('/api/' + action, {{ method: 'POST' }});
            const body = await res.json();
            document.getElementById('status').textContent = body.running ? 'RUNNING' : 'STOPPED';
        }}

        fetch('/api/board').then(r => r.json()).then(draw);
        const events = new EventSource('/sse/board');
        events.addEventListener('board', e => draw(JSON.parse(e.data)));
    </script>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /api/board -- current generation
// ---------------------------------------------------------------------------

/// Return the current generation for one-shot readers.
pub async fn get_board(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let generation = state.simulation.snapshot();
    Ok(Json(serde_json::to_value(BoardFrame::from(&generation))?))
}

// ---------------------------------------------------------------------------
// GET /api/status -- simulation status
// ---------------------------------------------------------------------------

/// Return running flag, counters, viewer count and timing.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let simulation = state.simulation.status();
    let uptime = Utc::now()
        .signed_duration_since(state.simulation.started_at())
        .num_seconds();

    Json(StatusResponse {
        simulation,
        subscribers: state.broadcaster.subscriber_count(),
        broadcast_capacity: state.broadcaster.capacity(),
        tick_interval_ms: state.tick_interval_ms(),
        // num_seconds can be negative if the clock steps backwards.
        uptime_seconds: u64::try_from(uptime.max(0)).unwrap_or(u64::MAX),
    })
}
