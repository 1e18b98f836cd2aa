//! Perfect-maze generation and shortest-path search on a grid
//!
//! This crate holds the algorithms shared by the host runner: a grid model
//! with per-cell walls, randomized Prim carving that produces a spanning
//! tree over the grid, Start/End placement, and A* search over the carved
//! corridors. Long phases are exposed as steppers so any scheduler can
//! interleave them with rendering and cancellation checks.
//!
//! The crate is no_std (it only needs `alloc`) and has no dependencies.

#![no_std]

extern crate alloc;

pub mod difficulty;
pub mod events;
pub mod grid;
pub mod maze_gen;
pub mod pqueue;
pub mod rng;
pub mod schedule;
pub mod selection;
pub mod solver;

// Re-export commonly used types for convenience
pub use difficulty::Difficulty;
pub use events::{MazeEvent, MazeSink, NullSink, Tag};
pub use grid::{Cell, Coord, Direction, Grid, Walls};
pub use maze_gen::{Carver, FrontierWall};
pub use rng::{MazeRng, SimpleLCG};
pub use schedule::{Batch, Flow, RunStatus, Step};
pub use selection::{Endpoints, END_RESELECT_ATTEMPTS, SELECTION_SAMPLES};
pub use solver::{AStar, SearchStep};

/// Frontier pops between generation yield points.
pub const DEFAULT_BATCH_SIZE: usize = 20;
