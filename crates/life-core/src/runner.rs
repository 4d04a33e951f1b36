//! The simulation loop.
//!
//! [`run_simulation`] ticks on a fixed interval for the lifetime of the
//! server. On every tick it asks the [`Simulation`] to advance (which is a
//! no-op while Idle) and publishes whatever generation comes back. The
//! loop never changes the running flag itself; start and stop come from
//! the control surface.
//!
//! A tick is synchronous from lock to publish, so shutdown is only
//! observed between ticks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::broadcast::BoardBroadcaster;
use crate::simulation::Simulation;

/// Shortest accepted tick interval.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    /// Timer ticks observed, Active or Idle.
    pub ticks: u64,
    /// Generations stepped and published.
    pub generations_published: u64,
}

/// Run the simulation loop until `shutdown` resolves.
///
/// Every `interval` the loop:
/// 1. locks the simulation and, if Active, steps the board,
/// 2. releases the lock,
/// 3. publishes the new generation to `broadcaster`.
///
/// Missed ticks (a stalled runtime) are delayed rather than bursted, so
/// viewers never receive a catch-up flood.
pub async fn run_simulation<F>(
    simulation: Arc<Simulation>,
    broadcaster: BoardBroadcaster,
    interval: Duration,
    shutdown: F,
) -> LoopSummary
where
    F: Future<Output = ()> + Send,
{
    let mut summary = LoopSummary::default();
    // tokio::time::interval rejects a zero period.
    let interval = interval.max(MIN_TICK_INTERVAL);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    info!(
        tick_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        board_size = simulation.size(),
        "Simulation loop starting"
    );

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Simulation loop shutdown requested");
                break;
            }
            _ = ticker.tick() => {
                summary.ticks = summary.ticks.saturating_add(1);
                if let Some(generation) = simulation.tick() {
                    let receivers = broadcaster.publish(&generation);
                    summary.generations_published =
                        summary.generations_published.saturating_add(1);
                    debug!(
                        run = generation.run,
                        generation = generation.number,
                        receivers,
                        "Generation published"
                    );
                }
            }
        }
    }

    log_loop_end(&summary);
    summary
}

/// Spawn [`run_simulation`] on the current Tokio runtime.
pub fn spawn_simulation<F>(
    simulation: Arc<Simulation>,
    broadcaster: BoardBroadcaster,
    interval: Duration,
    shutdown: F,
) -> tokio::task::JoinHandle<LoopSummary>
where
    F: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(run_simulation(simulation, broadcaster, interval, shutdown))
}

/// Log the loop exit counters.
pub fn log_loop_end(summary: &LoopSummary) {
    info!(
        ticks = summary.ticks,
        generations_published = summary.generations_published,
        "Simulation loop ended"
    );
}
