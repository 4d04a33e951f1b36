//! Board, step rule, run/stop state machine and generation fan-out for the
//! Torus Life server.
//!
//! This crate owns everything that touches simulation state. Transport and
//! rendering live in `life-observer`; this crate only ever hands out
//! immutable [`Generation`] snapshots.
//!
//! # Modules
//!
//! - [`board`] -- Fixed-size square matrix of cells.
//! - [`step`] -- Conway's rule on a torus.
//! - [`seed`] -- Random board seeding.
//! - [`simulation`] -- Shared run/stop state behind a single mutex.
//! - [`broadcast`] -- Per-subscriber bounded fan-out of generations.
//! - [`runner`] -- The timer-driven simulation loop.
//! - [`config`] -- Configuration loading from `life-config.yaml`.
//!
//! [`Generation`]: simulation::Generation

pub mod board;
pub mod broadcast;
pub mod config;
pub mod runner;
pub mod seed;
pub mod simulation;
pub mod step;

pub use board::{Board, BoardError};
pub use broadcast::{BoardBroadcaster, Subscription};
pub use simulation::{Generation, RunTransition, Simulation, SimulationStatus};
