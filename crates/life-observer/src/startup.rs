//! Server startup helper for embedding in the server binary.
//!
//! Provides [`spawn_observer`] which binds the listener eagerly and then
//! serves the viewer and control API on a background Tokio task, so bind
//! failures surface before the simulation starts.
//!
//! # Usage
//!
//! ```rust,ignore
//! use life_observer::spawn_observer;
//!
//! let handle = spawn_observer(&config.server, Arc::clone(&state), state.shutdown_signal()).await?;
//! // The server is now running. Await the handle on shutdown.
//! ```

use std::future::Future;
use std::sync::Arc;

use life_core::config::ServerConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::server::{ServerError, serve, socket_addr};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Bind the listener and spawn the HTTP server on a background task.
///
/// The server stops accepting connections once `shutdown` resolves. The
/// returned handle completes when the server has drained, which includes
/// open viewer streams only if [`AppState::trigger_shutdown`] is called.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot
/// be bound.
pub async fn spawn_observer<F>(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<JoinHandle<()>, StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = socket_addr(config)?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = serve(listener, state, shutdown).await {
            tracing::error!(error = %e, "Viewer server exited with error");
        }
    });

    tracing::info!(%addr, "Viewer server spawned on background task");

    Ok(handle)
}
