//! `WebSocket` handler for real-time generation streaming.
//!
//! Clients connect to `GET /ws/board` and receive a JSON-encoded
//! [`BoardFrame`] text message for every published generation. Each
//! connection has its own subscription, so a slow client only ever loses
//! its own oldest frames. On server shutdown the socket is closed.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use tracing::{debug, warn};

use crate::frame::BoardFrame;
use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and begin
/// streaming generations.
///
/// # Route
///
/// `GET /ws/board`
pub async fn ws_board(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Handle the `WebSocket` lifecycle: subscribe and forward each
/// generation until the client leaves or the channel closes.
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    debug!("WebSocket client connected");

    let mut subscription = state.subscribe();
    let shutdown = state.shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                debug!("Server shutting down, closing WebSocket");
                let _ = socket.send(Message::Close(None)).await;
                break;
            }
            next = subscription.next() => {
                let Some(generation) = next else {
                    debug!("Generation channel closed, shutting down WebSocket");
                    break;
                };
                let json = match serde_json::to_string(&BoardFrame::from(&generation)) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!("Failed to serialize board frame, closing WebSocket: {e}");
                        break;
                    }
                };
                if socket.send(Message::Text(json.into())).await.is_err() {
                    debug!("WebSocket client disconnected (send failed)");
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("WebSocket client disconnected");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!("WebSocket client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Text and binary from the client are ignored.
                    }
                }
            }
        }
    }

    debug!(skipped = subscription.skipped(), "WebSocket stream ended");
    subscription.close();
}
