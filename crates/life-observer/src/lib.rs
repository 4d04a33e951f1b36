//! Viewer and control API server for the Torus Life simulation.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Server-sent events** (`/sse/board`) and a **`WebSocket`**
//!   (`/ws/board`) streaming every published generation via a
//!   per-viewer [`Subscription`]
//! - **Control endpoints** (`POST /api/start`, `POST /api/stop`)
//! - **REST endpoints** for the current board and simulation status
//! - **HTML viewer** (`GET /`) that draws the board from the SSE stream
//!
//! # Architecture
//!
//! Handlers hold an [`Arc`](std::sync::Arc) to the shared
//! [`Simulation`] and a clone of the [`BoardBroadcaster`]. Control
//! handlers only flip the running flag; stream handlers only read
//! published generations. Neither ever holds the simulation lock across
//! an `.await`.
//!
//! [`Subscription`]: life_core::Subscription
//! [`Simulation`]: life_core::Simulation
//! [`BoardBroadcaster`]: life_core::BoardBroadcaster

pub mod control;
pub mod error;
pub mod frame;
pub mod handlers;
pub mod router;
pub mod server;
pub mod sse;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use frame::BoardFrame;
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use startup::spawn_observer;
pub use state::AppState;
