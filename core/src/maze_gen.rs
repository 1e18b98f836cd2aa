//! Maze generation using randomized Prim's algorithm
//!
//! Algorithm:
//! 1. Mark the seed cell as carved and push its walls toward uncarved
//!    neighbors onto the frontier
//! 2. While the frontier is not empty:
//!    - Take a frontier wall uniformly at random
//!    - If the cell across it is out of bounds or already carved, drop it
//!    - Otherwise open the wall, mark the target carved and push the
//!      target's walls toward uncarved neighbors
//!
//! Frontier entries go stale when their target is carved through another
//! wall first; they are validated when taken, never when pushed. A cell is
//! marked carved in the same step that opens its wall, so no cell is carved
//! twice and the result is a spanning tree.
//!
//! [`Carver`] performs one frontier pop per [`Carver::step`] so a driver can
//! yield between batches.

use alloc::vec::Vec;
use core::future::Future;

use crate::events::{MazeEvent, MazeSink, NullSink};
use crate::grid::{Coord, Direction, Grid};
use crate::rng::{MazeRng, SimpleLCG};
use crate::schedule::{run_batched, Flow, RunStatus, Step};

/// A wall on side `dir` of `cell` that may be opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontierWall {
    pub cell: Coord,
    pub dir: Direction,
}

impl FrontierWall {
    /// The cell on the other side of the wall.
    pub fn target(&self) -> Coord {
        self.cell.step(self.dir)
    }
}

/// Incremental Prim carver over a borrowed grid.
#[derive(Clone, Debug)]
pub struct Carver {
    frontier: Vec<FrontierWall>,
    seed: Coord,
    carved: usize,
}

impl Carver {
    /// Reset the whole grid and seed carving from a random cell at an odd
    /// row and odd column.
    pub fn full<R, S>(grid: &mut Grid, rng: &mut R, sink: &mut S) -> Self
    where
        R: MazeRng + ?Sized,
        S: MazeSink + ?Sized,
    {
        grid.reset();
        sink.notify(MazeEvent::WallsRestored { keep: None });

        let seed = Coord::new(random_odd(grid.rows(), rng), random_odd(grid.cols(), rng));
        Self::seeded(grid, seed)
    }

    /// Reset every cell except `start` and seed carving from `start`.
    ///
    /// `start` keeps its coordinates and stays carved. Its walls are
    /// restored like everyone else's so each wall pair stays in agreement.
    pub fn keep_start<S>(grid: &mut Grid, start: Coord, sink: &mut S) -> Self
    where
        S: MazeSink + ?Sized,
    {
        grid.reset();
        grid.cell_mut(start).in_maze = true;
        sink.notify(MazeEvent::WallsRestored { keep: Some(start) });

        Self::seeded(grid, start)
    }

    fn seeded(grid: &mut Grid, seed: Coord) -> Self {
        let mut carver = Self {
            frontier: Vec::new(),
            seed,
            carved: 1,
        };
        grid.cell_mut(seed).in_maze = true;
        carver.push_boundary(grid, seed);
        carver
    }

    fn push_boundary(&mut self, grid: &mut Grid, cell: Coord) {
        for dir in Direction::ALL {
            let next = cell.step(dir);
            if grid.contains(next) && !grid.cell(next).in_maze {
                self.frontier.push(FrontierWall { cell, dir });
            }
        }
        grid.cell_mut(cell).visited = true;
    }

    /// Pop one frontier wall. Returns [`Step::Done`] once the frontier is empty.
    pub fn step<R, S>(&mut self, grid: &mut Grid, rng: &mut R, sink: &mut S) -> Step
    where
        R: MazeRng + ?Sized,
        S: MazeSink + ?Sized,
    {
        if self.frontier.is_empty() {
            return Step::Done;
        }

        let wall = self.frontier.swap_remove(rng.choice_index(self.frontier.len()));
        let target = wall.target();
        if !grid.contains(target) || grid.cell(target).in_maze {
            return Step::Progress;
        }

        grid.remove_wall_between(wall.cell.row, wall.cell.col, wall.dir);
        grid.cell_mut(target).in_maze = true;
        self.carved += 1;
        sink.notify(MazeEvent::WallRemoved(wall.cell, target));

        self.push_boundary(grid, target);
        Step::Progress
    }

    /// The cell carving started from.
    pub fn seed(&self) -> Coord {
        self.seed
    }

    /// Cells carved so far, seed included.
    pub fn carved(&self) -> usize {
        self.carved
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Drive the carver to completion, awaiting `yield_point` after every
    /// `batch_size` frontier pops. A yield point answering [`Flow::Stop`]
    /// leaves a partial maze behind.
    pub async fn run_batched<R, S, Y, F>(
        &mut self,
        grid: &mut Grid,
        rng: &mut R,
        sink: &mut S,
        batch_size: usize,
        yield_point: Y,
    ) -> RunStatus
    where
        R: MazeRng + ?Sized,
        S: MazeSink + ?Sized,
        Y: FnMut() -> F,
        F: Future<Output = Flow>,
    {
        run_batched(
            batch_size,
            || self.step(&mut *grid, &mut *rng, &mut *sink),
            yield_point,
        )
        .await
    }
}

/// Uniform odd index in `[0, n)`, or 0 when there is none.
fn random_odd<R: MazeRng + ?Sized>(n: usize, rng: &mut R) -> usize {
    let odd_count = n / 2;
    if odd_count == 0 {
        0
    } else {
        rng.choice_index(odd_count) * 2 + 1
    }
}

/// Carve the whole grid without yielding. Returns the seed cell.
pub fn generate_full<R, S>(grid: &mut Grid, rng: &mut R, sink: &mut S) -> Coord
where
    R: MazeRng + ?Sized,
    S: MazeSink + ?Sized,
{
    let mut carver = Carver::full(grid, rng, sink);
    while carver.step(grid, rng, sink) == Step::Progress {}
    carver.seed()
}

/// Re-carve the grid around a fixed `start` without yielding.
pub fn regenerate_keep_start<R, S>(grid: &mut Grid, start: Coord, rng: &mut R, sink: &mut S)
where
    R: MazeRng + ?Sized,
    S: MazeSink + ?Sized,
{
    let mut carver = Carver::keep_start(grid, start, sink);
    while carver.step(grid, rng, sink) == Step::Progress {}
}

/// Generate a complete maze from a seed.
///
/// Same `(rows, cols, seed)` always produces the same maze.
pub fn generate(rows: usize, cols: usize, seed: u32) -> Grid {
    let mut grid = Grid::new(rows, cols);
    let mut rng = SimpleLCG::new(seed);
    generate_full(&mut grid, &mut rng, &mut NullSink);
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::schedule::block_on;
    use alloc::collections::VecDeque;
    use core::future::ready;
    use alloc::vec;

    /// Always picks the most recently pushed frontier wall.
    struct LastRng;

    impl MazeRng for LastRng {
        fn choice_index(&mut self, len: usize) -> usize {
            len - 1
        }
    }

    fn reachable(grid: &Grid, from: Coord) -> usize {
        let mut seen = vec![false; grid.cell_count()];
        let mut queue = VecDeque::from([from]);
        seen[grid.index(from)] = true;
        let mut count = 0;
        while let Some(c) = queue.pop_front() {
            count += 1;
            for n in grid.passages(c) {
                if !seen[grid.index(n)] {
                    seen[grid.index(n)] = true;
                    queue.push_back(n);
                }
            }
        }
        count
    }

    fn assert_spanning_tree(grid: &Grid) {
        assert_eq!(grid.passage_count(), grid.cell_count() - 1);
        assert!(grid.walls_symmetric());
        assert_eq!(reachable(grid, Coord::new(0, 0)), grid.cell_count());
        assert!(grid.coords().all(|c| grid.cell(c).in_maze));
    }

    #[test]
    fn test_maze_generation() {
        for (rows, cols, seed) in [(3, 3, 1), (5, 5, 12345), (7, 11, 99), (21, 15, 2918957128)] {
            let grid = generate(rows, cols, seed);
            assert_spanning_tree(&grid);
        }
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate(11, 11, 99999), generate(11, 11, 99999));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate(11, 11, 11111), generate(11, 11, 22222));
    }

    #[test]
    fn test_seed_is_odd_cell() {
        for seed in 1..20 {
            let mut grid = Grid::new(9, 9);
            let mut rng = SimpleLCG::new(seed);
            let start = generate_full(&mut grid, &mut rng, &mut NullSink);
            assert_eq!(start.row % 2, 1);
            assert_eq!(start.col % 2, 1);
        }
    }

    #[test]
    fn test_single_cell_grid() {
        let grid = generate(1, 1, 7);
        assert_eq!(grid.passage_count(), 0);
        assert!(grid.cell(Coord::new(0, 0)).in_maze);
    }

    #[test]
    fn test_single_row_grid() {
        let grid = generate(1, 9, 7);
        assert_spanning_tree(&grid);
    }

    #[test]
    fn test_events_match_passages() {
        let mut grid = Grid::new(7, 7);
        let mut events = Vec::new();
        generate_full(&mut grid, &mut SimpleLCG::new(5), &mut events);

        assert_eq!(events[0], MazeEvent::WallsRestored { keep: None });
        let removed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                MazeEvent::WallRemoved(a, b) => Some((*a, *b)),
                _ => None,
            })
            .collect();
        assert_eq!(removed.len(), 48);
        for (a, b) in removed {
            assert_eq!(a.manhattan(b), 1);
            assert!(grid.passages(a).any(|n| n == b));
        }
    }

    #[test]
    fn test_scripted_carve_order() {
        // Seed (1,1); always taking the newest wall goes Left, then down,
        // then clockwise around the rim back to (0,0).
        let mut grid = Grid::new(3, 3);
        let mut carver = Carver::full(&mut grid, &mut LastRng, &mut NullSink);
        assert_eq!(carver.seed(), Coord::new(1, 1));
        assert_eq!(carver.frontier_len(), 4);

        while carver.step(&mut grid, &mut LastRng, &mut NullSink) == Step::Progress {}
        assert_eq!(carver.carved(), 9);
        assert_spanning_tree(&grid);

        assert!(!grid.has_wall(Coord::new(1, 1), Direction::Left));
        assert!(!grid.has_wall(Coord::new(1, 0), Direction::Bottom));
        assert!(!grid.has_wall(Coord::new(2, 0), Direction::Right));

        let expected: Vec<Vec<u8>> = vec![
            vec![0, 0, 0, 0, 0, 0, 0],
            vec![0, 1, 1, 1, 1, 1, 0],
            vec![0, 0, 0, 0, 0, 1, 0],
            vec![0, 1, 1, 1, 0, 1, 0],
            vec![0, 1, 0, 0, 0, 1, 0],
            vec![0, 1, 1, 1, 1, 1, 0],
            vec![0, 0, 0, 0, 0, 0, 0],
        ];
        assert_eq!(grid.to_binary_grid(), expected);
    }

    #[test]
    fn test_keep_start_resets_other_cells() {
        let mut grid = generate(9, 9, 321);
        let start = Coord::new(4, 6);

        let carver = Carver::keep_start(&mut grid, start, &mut NullSink);
        assert_eq!(carver.seed(), start);
        assert!(grid.cell(start).in_maze);
        for c in grid.coords().filter(|&c| c != start) {
            assert_eq!(*grid.cell(c), Cell::blank());
        }
        assert!(grid.walls_symmetric());
    }

    #[test]
    fn test_keep_start_regeneration() {
        let mut grid = generate(9, 9, 321);
        let start = Coord::new(8, 0);
        let mut rng = SimpleLCG::new(77);

        regenerate_keep_start(&mut grid, start, &mut rng, &mut NullSink);
        assert_spanning_tree(&grid);
        assert!(grid.cell(start).in_maze);
    }

    #[test]
    fn test_run_batched_abort_leaves_partial_maze() {
        let mut grid = Grid::new(15, 15);
        let mut rng = SimpleLCG::new(3);
        let mut carver = Carver::full(&mut grid, &mut rng, &mut NullSink);

        let status = block_on(carver.run_batched(&mut grid, &mut rng, &mut NullSink, 20, || {
            ready(Flow::Stop)
        }));
        assert_eq!(status, RunStatus::Aborted);
        assert!(carver.carved() < grid.cell_count());
        assert!(grid.walls_symmetric());
        assert_eq!(grid.passage_count(), carver.carved() - 1);
    }

    #[test]
    fn test_run_batched_completes() {
        let mut grid = Grid::new(15, 15);
        let mut rng = SimpleLCG::new(3);
        let mut carver = Carver::full(&mut grid, &mut rng, &mut NullSink);
        let mut yields = 0;

        let status = block_on(carver.run_batched(&mut grid, &mut rng, &mut NullSink, 20, || {
            yields += 1;
            ready(Flow::Continue)
        }));
        assert_eq!(status, RunStatus::Complete);
        assert!(yields > 0);
        assert_spanning_tree(&grid);
    }
}
