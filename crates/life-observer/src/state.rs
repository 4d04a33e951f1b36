//! Shared application state for the viewer and control API.
//!
//! [`AppState`] holds the shared [`Simulation`] and the publishing side of
//! the generation channel. It is wrapped in [`Arc`] and injected into every
//! handler through Axum's `State` extractor.
//!
//! It also carries the process shutdown flag. Long-lived SSE and
//! `WebSocket` streams watch it and end when it is raised, which lets the
//! server's graceful shutdown drain while viewers are still connected.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use life_core::config::LifeConfig;
use life_core::{BoardBroadcaster, BoardError, Simulation, Subscription};
use tokio::sync::watch;

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The simulation the control endpoints drive.
    pub simulation: Arc<Simulation>,
    /// Publishing side of the generation channel; handlers subscribe here.
    pub broadcaster: BoardBroadcaster,
    /// Tick interval the simulation loop runs at, for status reporting.
    pub tick_interval: Duration,
    /// Shutdown flag; `true` once shutdown has been triggered.
    shutdown: Arc<watch::Sender<bool>>,
}

impl AppState {
    /// Create application state around an existing simulation and channel.
    pub fn new(
        simulation: Arc<Simulation>,
        broadcaster: BoardBroadcaster,
        tick_interval: Duration,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            simulation,
            broadcaster,
            tick_interval,
            shutdown: Arc::new(shutdown),
        }
    }

    /// Build a fresh idle simulation and channel from configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] if the configured board size is invalid.
    pub fn from_config(config: &LifeConfig) -> Result<Self, BoardError> {
        let simulation = Simulation::from_config(&config.world)?;
        Ok(Self::new(
            Arc::new(simulation),
            BoardBroadcaster::new(config.broadcast.capacity),
            config.world.tick_interval(),
        ))
    }

    /// Subscribe a new viewer to the generation stream.
    pub fn subscribe(&self) -> Subscription {
        self.broadcaster.subscribe()
    }

    /// Raise the shutdown flag. Idempotent.
    pub fn trigger_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    /// A future that resolves once shutdown is triggered.
    ///
    /// Resolves immediately if it already has been.
    pub fn shutdown_signal(&self) -> impl Future<Output = ()> + Send + use<> {
        let mut rx = self.shutdown.subscribe();
        async move {
            // Err means every sender is gone.
            let _ = rx.wait_for(|stop| *stop).await;
        }
    }

    /// Tick interval in whole milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        u64::try_from(self.tick_interval.as_millis()).unwrap_or(u64::MAX)
    }
}
