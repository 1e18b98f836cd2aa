//! A* shortest path over a carved maze
//!
//! Edges are the open walls between adjacent cells, each of unit cost. The
//! heuristic is the Manhattan distance to End, which never overestimates
//! on a 4-connected unit grid, so the first time End is popped its path is
//! a shortest one. In a perfect maze that is the unique tree path.
//!
//! [`AStar`] expands one cell per [`AStar::step`] so a driver can yield and
//! redraw between expansions. Pops are capped at `rows * cols`; hitting
//! the cap is reported like an exhausted open set.

use alloc::vec;
use alloc::vec::Vec;

use crate::events::{MazeEvent, MazeSink, Tag};
use crate::grid::{Coord, Grid};
use crate::pqueue::IndexedMinHeap;

/// Outcome of a single search step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStep {
    /// A cell was closed and its neighbors relaxed.
    Expanded(Coord),
    /// End was reached; the path runs Start to End inclusive.
    Found(Vec<Coord>),
    /// The open set emptied or the iteration cap was hit.
    NotFound,
}

pub struct AStar {
    start: Coord,
    end: Coord,
    open: IndexedMinHeap,
    closed: Vec<bool>,
    g_score: Vec<usize>,
    came_from: Vec<Option<usize>>,
    expanded: Vec<Coord>,
    iterations: usize,
    max_iterations: usize,
}

impl AStar {
    pub fn new(grid: &Grid, start: Coord, end: Coord) -> Self {
        let cells = grid.cell_count();
        let mut search = Self {
            start,
            end,
            open: IndexedMinHeap::with_capacity(cells),
            closed: vec![false; cells],
            g_score: vec![usize::MAX; cells],
            came_from: vec![None; cells],
            expanded: Vec::new(),
            iterations: 0,
            max_iterations: cells,
        };

        if grid.contains(start) && grid.contains(end) {
            let s = grid.index(start);
            search.g_score[s] = 0;
            search.open.push_or_decrease(s, start.manhattan(end));
        }
        search
    }

    /// Pop the lowest f-score cell and either finish or expand it.
    pub fn step<S>(&mut self, grid: &Grid, sink: &mut S) -> SearchStep
    where
        S: MazeSink + ?Sized,
    {
        if self.iterations >= self.max_iterations {
            return SearchStep::NotFound;
        }
        let Some((key, _)) = self.open.pop() else {
            return SearchStep::NotFound;
        };
        self.iterations += 1;

        let current = grid.coord(key);
        if current == self.end {
            let path = self.reconstruct(grid, key);
            for &c in &path {
                sink.notify(MazeEvent::CellMarked(c, Tag::Path));
            }
            return SearchStep::Found(path);
        }

        self.closed[key] = true;
        self.expanded.push(current);
        if !self.is_endpoint(current) {
            sink.notify(MazeEvent::CellMarked(current, Tag::Visited));
        }

        let tentative = self.g_score[key] + 1;
        for next in grid.passages(current) {
            let n = grid.index(next);
            if self.closed[n] || tentative >= self.g_score[n] {
                continue;
            }
            self.came_from[n] = Some(key);
            self.g_score[n] = tentative;
            self.open.push_or_decrease(n, tentative + next.manhattan(self.end));
        }

        SearchStep::Expanded(current)
    }

    fn reconstruct(&self, grid: &Grid, end: usize) -> Vec<Coord> {
        let mut path = vec![grid.coord(end)];
        let mut current = end;
        while let Some(prev) = self.came_from[current] {
            path.push(grid.coord(prev));
            current = prev;
        }
        path.reverse();
        path
    }

    /// Whether `c` is Start or End. Drivers skip yielding on these.
    pub fn is_endpoint(&self, c: Coord) -> bool {
        c == self.start || c == self.end
    }

    /// Cells closed so far, in expansion order.
    pub fn expanded(&self) -> &[Coord] {
        &self.expanded
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

/// Run A* to completion. Returns the Start-to-End path, or `None`.
pub fn solve<S>(grid: &Grid, start: Coord, end: Coord, sink: &mut S) -> Option<Vec<Coord>>
where
    S: MazeSink + ?Sized,
{
    let mut search = AStar::new(grid, start, end);
    loop {
        match search.step(grid, sink) {
            SearchStep::Expanded(_) => {}
            SearchStep::Found(path) => return Some(path),
            SearchStep::NotFound => return None,
        }
    }
}
