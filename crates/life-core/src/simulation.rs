//! Shared simulation state: the current board and the run/stop flag.
//!
//! [`Simulation`] is created once per server and shared behind an
//! [`Arc`] between the simulation loop and the HTTP handlers. Every read
//! and write of the board, the running flag and the generation counters
//! goes through one mutex, so a stop request can never interleave with a
//! half-finished step.
//!
//! # State machine
//!
//! | From | Event | To | Effect |
//! |------|-------|----|--------|
//! | Idle | [`start`](Simulation::start) | Active | board reseeded, new run |
//! | Active | [`start`](Simulation::start) | Active | none |
//! | Active | [`stop`](Simulation::stop) | Idle | none |
//! | Idle | [`stop`](Simulation::stop) | Idle | none |
//! | Active | [`tick`](Simulation::tick) | Active | board stepped |
//! | Idle | [`tick`](Simulation::tick) | Idle | none |
//!
//! The critical sections never await, so a plain [`std::sync::Mutex`] is
//! used and the synchronous control calls return without touching the
//! runtime.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Board, BoardError};
use crate::config::WorldConfig;
use crate::seed::seed;
use crate::step::step;

/// One published board, tagged with where it sits in the simulation's
/// history.
///
/// `(run, number)` is strictly increasing over everything the simulation
/// loop publishes. The board is shared, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    /// Run counter, incremented on every Idle to Active transition. 0
    /// before the first start.
    pub run: u64,
    /// Steps taken since the run was seeded. 0 is the seeded board.
    pub number: u64,
    /// The board for this generation.
    pub board: Arc<Board>,
}

/// Outcome of a start or stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTransition {
    /// Idle to Active; the board was reseeded.
    Started,
    /// Start requested while already Active; nothing changed.
    AlreadyRunning,
    /// Active to Idle.
    Stopped,
    /// Stop requested while already Idle; nothing changed.
    AlreadyStopped,
}

impl RunTransition {
    /// Whether the request changed the running flag.
    pub const fn changed(self) -> bool {
        matches!(self, Self::Started | Self::Stopped)
    }

    /// The running flag after the request.
    pub const fn running(self) -> bool {
        matches!(self, Self::Started | Self::AlreadyRunning)
    }
}

/// Point-in-time view of the simulation for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationStatus {
    /// Whether the simulation loop is stepping the board.
    pub running: bool,
    /// Current run counter.
    pub run: u64,
    /// Generation number within the current run.
    pub generation: u64,
    /// Live cells on the current board.
    pub live_cells: u64,
    /// Board side length.
    pub board_size: usize,
    /// ISO 8601 timestamp of when the simulation was created.
    pub started_at: String,
}

/// Mutable state guarded by the simulation mutex.
#[derive(Debug)]
struct SimulationInner {
    board: Arc<Board>,
    running: bool,
    run: u64,
    number: u64,
    rng: StdRng,
}

/// The shared simulation aggregate.
#[derive(Debug)]
pub struct Simulation {
    inner: Mutex<SimulationInner>,
    size: usize,
    started_at: DateTime<Utc>,
}

impl Simulation {
    /// Create an idle simulation with an all-dead `size` × `size` board.
    ///
    /// `rng` is used for every reseed on start.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] if `size` is not a valid board size.
    pub fn new(size: usize, rng: StdRng) -> Result<Self, BoardError> {
        let board = Board::new(size)?;
        Ok(Self {
            inner: Mutex::new(SimulationInner {
                board: Arc::new(board),
                running: false,
                run: 0,
                number: 0,
                rng,
            }),
            size,
            started_at: Utc::now(),
        })
    }

    /// Create an idle simulation from the `world` configuration section.
    ///
    /// A configured seed makes every reseed reproducible; otherwise the RNG
    /// is seeded from the operating system.
    ///
    /// # Errors
    ///
    /// Returns a [`BoardError`] if the configured size is invalid.
    pub fn from_config(config: &WorldConfig) -> Result<Self, BoardError> {
        let rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        Self::new(config.size, rng)
    }

    /// Board side length, fixed at construction.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Whether the simulation is Active.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Idle to Active: reseed the board and begin a new run.
    ///
    /// A start while already Active leaves the board alone.
    pub fn start(&self) -> RunTransition {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.running {
            debug!(run = inner.run, "Start ignored, simulation already running");
            return RunTransition::AlreadyRunning;
        }

        let seeded = seed(&inner.board, &mut inner.rng);
        let live_cells = seeded.live_count();
        inner.board = Arc::new(seeded);
        inner.running = true;
        inner.run = inner.run.saturating_add(1);
        inner.number = 0;

        info!(run = inner.run, live_cells, "Simulation started");
        RunTransition::Started
    }

    /// Active to Idle. The board is kept as it is.
    pub fn stop(&self) -> RunTransition {
        let mut inner = self.lock();
        if !inner.running {
            debug!("Stop ignored, simulation already stopped");
            return RunTransition::AlreadyStopped;
        }
        inner.running = false;

        info!(run = inner.run, generation = inner.number, "Simulation stopped");
        RunTransition::Stopped
    }

    /// The current generation, read under the lock.
    pub fn snapshot(&self) -> Generation {
        let inner = self.lock();
        Generation {
            run: inner.run,
            number: inner.number,
            board: Arc::clone(&inner.board),
        }
    }

    /// Advance the board by one generation if Active.
    ///
    /// Returns the new generation, or `None` when Idle. The running check,
    /// the step and the store happen in one critical section; the caller
    /// publishes the result after the lock is released.
    pub fn tick(&self) -> Option<Generation> {
        let mut inner = self.lock();
        if !inner.running {
            return None;
        }

        let next = Arc::new(step(&inner.board));
        inner.board = Arc::clone(&next);
        inner.number = inner.number.saturating_add(1);

        Some(Generation {
            run: inner.run,
            number: inner.number,
            board: next,
        })
    }

    /// Current status for reporting.
    pub fn status(&self) -> SimulationStatus {
        let inner = self.lock();
        SimulationStatus {
            running: inner.running,
            run: inner.run,
            generation: inner.number,
            live_cells: u64::try_from(inner.board.live_count()).unwrap_or(u64::MAX),
            board_size: self.size,
            started_at: self.started_at.to_rfc3339(),
        }
    }

    /// Wall-clock creation time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Take the simulation lock.
    ///
    /// Every operation under the lock is total, so a poisoned mutex still
    /// holds consistent state and is recovered.
    fn lock(&self) -> MutexGuard<'_, SimulationInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
