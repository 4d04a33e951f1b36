//! Server-sent events stream of published generations.
//!
//! Clients connect to `GET /sse/board` and receive one `board` event per
//! generation, with a JSON [`BoardFrame`] as data. Each connection owns its
//! own [`Subscription`](life_core::Subscription); when the client goes
//! away Axum drops the stream and the subscription with it. The stream
//! also ends once [`AppState::trigger_shutdown`] is called.

use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt as _};
use life_core::Generation;
use tracing::debug;

use crate::error::ObserverError;
use crate::frame::BoardFrame;
use crate::state::AppState;

/// Name of the SSE event carrying a frame.
pub const BOARD_EVENT: &str = "board";

/// Open an SSE stream of generations.
///
/// # Route
///
/// `GET /sse/board`
pub async fn sse_board(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, ObserverError>> + Send + 'static> {
    debug!("SSE client connected");

    let stream = state
        .subscribe()
        .into_stream()
        .take_until(state.shutdown_signal())
        .map(|generation| frame_event(&generation));

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Encode one generation as a `board` event.
pub fn frame_event(generation: &Generation) -> Result<Event, ObserverError> {
    let json = serde_json::to_string(&BoardFrame::from(generation))?;
    Ok(Event::default().event(BOARD_EVENT).data(json))
}
