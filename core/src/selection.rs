//! Start/End placement
//!
//! After a full carve both endpoints are chosen by sampling random pairs
//! and keeping the farthest apart. After a keep-Start carve only End moves:
//! random candidates are tried until one is at least `min_distance` away.
//! Either way, when sampling comes up empty the farthest grid corner is used.

use crate::grid::{Coord, Grid};
use crate::rng::MazeRng;

/// Random pairs tried by [`select_start_end`].
pub const SELECTION_SAMPLES: usize = 1000;

/// Random End candidates tried by [`reselect_end`].
pub const END_RESELECT_ATTEMPTS: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub start: Coord,
    pub end: Coord,
    /// End came from the corner fallback rather than sampling.
    pub fallback: bool,
}

impl Endpoints {
    pub fn distance(&self) -> usize {
        self.start.manhattan(self.end)
    }
}

fn random_cell<R: MazeRng + ?Sized>(grid: &Grid, rng: &mut R) -> Coord {
    Coord::new(rng.choice_index(grid.rows()), rng.choice_index(grid.cols()))
}

/// The grid corner farthest from `from`. Ties go to the earlier corner in
/// [`Grid::corners`] order.
pub fn farthest_corner(grid: &Grid, from: Coord) -> Coord {
    let corners = grid.corners();
    let mut best = corners[0];
    for corner in &corners[1..] {
        if from.manhattan(*corner) > from.manhattan(best) {
            best = *corner;
        }
    }
    best
}

/// Sample `samples` random pairs and keep the one with the greatest
/// Manhattan distance, skipping pairs where Start equals End.
///
/// If no sample separates the endpoints (a 1×1 grid, or `samples == 0`),
/// End is the corner farthest from the first sampled Start.
///
/// No minimum distance applies here. On a grid too small for the
/// difficulty's `min_distance` the farthest sampled pair is returned as is,
/// with `fallback` unset; only [`reselect_end`] enforces a minimum.
pub fn select_start_end<R>(grid: &Grid, rng: &mut R, samples: usize) -> Endpoints
where
    R: MazeRng + ?Sized,
{
    let mut first_start = None;
    let mut best: Option<(Coord, Coord)> = None;
    let mut best_distance = 0;

    for _ in 0..samples {
        let start = random_cell(grid, rng);
        let end = random_cell(grid, rng);
        first_start.get_or_insert(start);
        if start == end {
            continue;
        }
        let distance = start.manhattan(end);
        if distance > best_distance {
            best_distance = distance;
            best = Some((start, end));
        }
    }

    match best {
        Some((start, end)) => Endpoints {
            start,
            end,
            fallback: false,
        },
        None => {
            let start = first_start.unwrap_or_else(|| random_cell(grid, rng));
            Endpoints {
                start,
                end: farthest_corner(grid, start),
                fallback: true,
            }
        }
    }
}

/// Pick a new End for a fixed `start`: the first of `attempts` random
/// candidates at least `min_distance` away, else the farthest corner.
pub fn reselect_end<R>(
    grid: &Grid,
    start: Coord,
    min_distance: usize,
    rng: &mut R,
    attempts: usize,
) -> Endpoints
where
    R: MazeRng + ?Sized,
{
    for _ in 0..attempts {
        let end = random_cell(grid, rng);
        if end != start && start.manhattan(end) >= min_distance {
            return Endpoints {
                start,
                end,
                fallback: false,
            };
        }
    }

    Endpoints {
        start,
        end: farthest_corner(grid, start),
        fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleLCG;

    /// Replays a fixed list of indices.
    struct Scripted(&'static [usize]);

    impl MazeRng for Scripted {
        fn choice_index(&mut self, len: usize) -> usize {
            let (first, rest) = self.0.split_first().expect("script exhausted");
            self.0 = rest;
            first % len
        }
    }

    #[test]
    fn test_farthest_corner() {
        let grid = Grid::new(9, 15);
        assert_eq!(farthest_corner(&grid, Coord::new(1, 2)), Coord::new(8, 14));
        assert_eq!(farthest_corner(&grid, Coord::new(7, 13)), Coord::new(0, 0));
        // Center of a square grid: all corners tie, first one wins
        let square = Grid::new(5, 5);
        assert_eq!(farthest_corner(&square, Coord::new(2, 2)), Coord::new(0, 0));
    }

    #[test]
    fn test_select_keeps_farthest_pair() {
        let grid = Grid::new(5, 5);
        // Pairs: (1,1)-(2,2) d=2, (0,0)-(4,3) d=7, (3,3)-(3,3) skipped
        let mut rng = Scripted(&[1, 1, 2, 2, 0, 0, 4, 3, 3, 3, 3, 3]);
        let picked = select_start_end(&grid, &mut rng, 3);

        assert_eq!(picked.start, Coord::new(0, 0));
        assert_eq!(picked.end, Coord::new(4, 3));
        assert_eq!(picked.distance(), 7);
        assert!(!picked.fallback);
    }

    #[test]
    fn test_select_on_large_grid_is_far_apart() {
        let grid = Grid::new(41, 41);
        let mut rng = SimpleLCG::new(2918957128);
        let picked = select_start_end(&grid, &mut rng, SELECTION_SAMPLES);

        assert_ne!(picked.start, picked.end);
        assert!(picked.distance() >= 25, "distance {}", picked.distance());
    }

    #[test]
    fn test_select_ignores_min_distance_on_small_grid() {
        // 9x9 tops out at distance 16, below the hardest difficulty's minimum of 25
        let grid = Grid::new(9, 9);
        let mut rng = SimpleLCG::new(3);
        let picked = select_start_end(&grid, &mut rng, SELECTION_SAMPLES);

        assert!(!picked.fallback);
        assert_ne!(picked.start, picked.end);
        assert!(picked.distance() <= 16);
        assert!(picked.distance() < crate::Difficulty::new(10).unwrap().min_distance());
    }

    #[test]
    fn test_select_single_cell_falls_back() {
        let grid = Grid::new(1, 1);
        let mut rng = SimpleLCG::new(9);
        let picked = select_start_end(&grid, &mut rng, SELECTION_SAMPLES);

        assert!(picked.fallback);
        assert_eq!(picked.start, Coord::new(0, 0));
        assert_eq!(picked.end, Coord::new(0, 0));
    }

    #[test]
    fn test_reselect_meets_min_distance() {
        let grid = Grid::new(31, 31);
        let start = Coord::new(15, 15);
        for seed in 1..50 {
            let mut rng = SimpleLCG::new(seed);
            let picked = reselect_end(&grid, start, 12, &mut rng, END_RESELECT_ATTEMPTS);
            assert_eq!(picked.start, start);
            assert!(picked.fallback || picked.distance() >= 12);
        }
    }

    #[test]
    fn test_reselect_falls_back_to_farthest_corner() {
        // No cell of a 5x5 grid is 25 steps away from anything
        let grid = Grid::new(5, 5);
        let start = Coord::new(1, 3);
        let mut rng = SimpleLCG::new(4);
        let picked = reselect_end(&grid, start, 25, &mut rng, END_RESELECT_ATTEMPTS);

        assert!(picked.fallback);
        assert_eq!(picked.end, Coord::new(4, 0));
        let best_corner = grid.corners().iter().map(|c| start.manhattan(*c)).max();
        assert_eq!(Some(picked.distance()), best_corner);
    }
}
