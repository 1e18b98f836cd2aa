//! JSON snapshots of a solved maze
//!
//! A snapshot stores the binary grid rather than per-cell walls, so it can
//! be viewed or re-solved without this crate's types.

use std::path::Path;

use maze_core::selection::{select_start_end, SELECTION_SAMPLES};
use maze_core::{maze_gen, solver, Coord, Grid, NullSink, SimpleLCG};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RunnerError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MazeSnapshot {
    /// The seed used to generate this maze
    pub seed: u32,

    /// Cell dimensions (odd)
    pub rows: usize,
    pub cols: usize,

    /// Binary grid, `(rows*2 + 1) × (cols*2 + 1)`, 0 = wall, 1 = open
    pub grid_data: Vec<Vec<u8>>,

    /// `[row, col]` of Start and End
    pub start: [usize; 2],
    pub end: [usize; 2],

    /// Start-to-End path, empty when none was found
    pub path: Vec<[usize; 2]>,
}

fn pair(c: Coord) -> [usize; 2] {
    [c.row, c.col]
}

fn coord([row, col]: [usize; 2]) -> Coord {
    Coord::new(row, col)
}

impl MazeSnapshot {
    pub fn capture(seed: u32, grid: &Grid, start: Coord, end: Coord, path: &[Coord]) -> Self {
        Self {
            seed,
            rows: grid.rows(),
            cols: grid.cols(),
            grid_data: grid.to_binary_grid(),
            start: pair(start),
            end: pair(end),
            path: path.iter().copied().map(pair).collect(),
        }
    }

    /// Carve a full maze from `seed`, place Start/End and solve it.
    pub fn generate(rows: usize, cols: usize, seed: u32) -> Self {
        tracing::info!("Generating {}x{} maze from seed {}", rows, cols, seed);

        let mut grid = Grid::new(rows, cols);
        let mut rng = SimpleLCG::new(seed);
        maze_gen::generate_full(&mut grid, &mut rng, &mut NullSink);
        let endpoints = select_start_end(&grid, &mut rng, SELECTION_SAMPLES);
        let path = solver::solve(&grid, endpoints.start, endpoints.end, &mut NullSink)
            .unwrap_or_default();

        tracing::info!(
            "Maze generated: start={:?} end={:?} path_len={}",
            endpoints.start,
            endpoints.end,
            path.len()
        );
        Self::capture(seed, &grid, endpoints.start, endpoints.end, &path)
    }

    pub fn start(&self) -> Coord {
        coord(self.start)
    }

    pub fn end(&self) -> Coord {
        coord(self.end)
    }

    pub fn path(&self) -> Vec<Coord> {
        self.path.iter().copied().map(coord).collect()
    }

    /// Rebuild the maze grid, checking it against the stored dimensions
    /// and endpoints.
    pub fn to_grid(&self) -> Result<Grid> {
        let grid = Grid::from_binary_grid(&self.grid_data).ok_or_else(|| {
            RunnerError::Snapshot("grid_data is not a (2n+1) x (2m+1) binary grid".to_string())
        })?;
        if (grid.rows(), grid.cols()) != (self.rows, self.cols) {
            return Err(RunnerError::Snapshot(format!(
                "grid_data is {}x{} cells but the snapshot says {}x{}",
                grid.rows(),
                grid.cols(),
                self.rows,
                self.cols
            )));
        }
        if !grid.contains(self.start()) || !grid.contains(self.end()) {
            return Err(RunnerError::Snapshot(
                "start or end lies outside the grid".to_string(),
            ));
        }
        Ok(grid)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
