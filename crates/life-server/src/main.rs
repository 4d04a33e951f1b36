//! Server binary for Torus Life.
//!
//! Wires together the shared simulation, the periodic simulation loop, and
//! the viewer and control API. The process runs until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `life-config.yaml` (defaults if absent)
//! 2. Initialize structured logging (tracing)
//! 3. Create the idle simulation and the generation channel
//! 4. Bind and spawn the viewer server
//! 5. Spawn the simulation loop
//! 6. Wait for Ctrl-C, then stop the loop and drain the server

mod error;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use life_core::config::{LifeConfig, LoggingConfig};
use life_core::runner;
use life_observer::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ServerAppError;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "life-config.yaml";

/// How long the server may take to drain after Ctrl-C.
const SERVER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, board construction, logging setup
/// or the server bind fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("life-server starting");
    info!(
        board_size = config.world.size,
        tick_interval_ms = config.world.tick_interval_ms,
        seed = ?config.world.seed,
        broadcast_capacity = config.broadcast.capacity,
        "Configuration loaded"
    );

    // 3. Create the simulation and channel.
    let state = Arc::new(AppState::from_config(&config).map_err(ServerAppError::from)?);
    info!("Simulation created, waiting for start");

    // 4. Start the viewer server.
    let server_handle = life_observer::spawn_observer(
        &config.server,
        Arc::clone(&state),
        state.shutdown_signal(),
    )
    .await
    .map_err(ServerAppError::from)?;
    info!(
        host = config.server.host,
        port = config.server.port,
        "Viewer server started"
    );

    // 5. Start the simulation loop.
    let loop_handle = runner::spawn_simulation(
        Arc::clone(&state.simulation),
        state.broadcaster.clone(),
        state.tick_interval,
        state.shutdown_signal(),
    );

    // 6. Run until Ctrl-C.
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C, shutting down");
    }
    info!("Shutdown requested");
    // Stops the loop between ticks and ends every open viewer stream.
    state.trigger_shutdown();

    match loop_handle.await {
        Ok(summary) => info!(
            generations_published = summary.generations_published,
            "Simulation loop joined"
        ),
        Err(e) => warn!(error = %e, "Simulation loop task failed"),
    }

    let abort = server_handle.abort_handle();
    if tokio::time::timeout(SERVER_DRAIN_TIMEOUT, server_handle)
        .await
        .is_err()
    {
        warn!(
            timeout_secs = SERVER_DRAIN_TIMEOUT.as_secs(),
            "Viewer server did not drain in time, aborting"
        );
        abort.abort();
    }

    info!("life-server shutdown complete");
    Ok(())
}

/// Load configuration from [`CONFIG_PATH`].
///
/// Looks for the config file relative to the current working directory.
/// Environment overrides apply whether or not the file exists.
fn load_config() -> Result<LifeConfig, ServerAppError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(LifeConfig::from_file(config_path)?)
    } else {
        let mut config = LifeConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), ServerAppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let result = if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    result.map_err(|e| ServerAppError::Logging {
        message: e.to_string(),
    })
}
