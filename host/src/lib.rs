//! Async runner for the maze generate → solve → advance cycle
//!
//! The algorithms live in `maze_core`; this crate schedules them on tokio,
//! enforces the phase rules and hands every visual change to a
//! [`maze_core::MazeSink`].

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod phase;
pub mod render;
pub mod snapshot;

pub use config::{RunnerConfig, Viewport};
pub use error::{Result, RunnerError};
pub use orchestrator::{Controller, CycleEnd, MazeRunner, SolveOutcome};
pub use phase::{Phase, PhaseTracker};
pub use render::{AsciiCanvas, TracingSink};
pub use snapshot::MazeSnapshot;
