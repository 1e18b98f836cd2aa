//! Error types for the maze runner

use crate::phase::Phase;

/// Result type alias
pub type Result<T> = std::result::Result<T, RunnerError>;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A phase was requested while another one holds the grid
    #[error("cannot start {requested} while {active} is in progress")]
    PhaseConflict {
        /// Phase that was asked for
        requested: Phase,
        /// Phase currently running
        active: Phase,
    },

    /// Transition not allowed from the current phase
    #[error("invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },

    /// Solve or advance attempted before Start/End exist
    #[error("Start and End have not been placed")]
    MissingEndpoints,

    /// Advance attempted without a solved path to advance along
    #[error("no solved path to advance along")]
    NotSolved,

    /// Configuration rejected by validation
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Snapshot file does not describe a usable maze
    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
