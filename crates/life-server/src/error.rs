//! Error types for the server binary.
//!
//! [`ServerAppError`] is the top-level error type that wraps every
//! failure mode during startup.

use life_core::BoardError;
use life_core::config::ConfigError;
use life_observer::startup::StartupError;

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServerAppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The configured board could not be built.
    #[error("board error: {source}")]
    Board {
        /// The underlying board error.
        #[from]
        source: BoardError,
    },

    /// The viewer server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: StartupError,
    },

    /// Logging could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}
