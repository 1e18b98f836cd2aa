//! Grid model: cells, walls and direction arithmetic
//!
//! The grid is a `rows × cols` array of cells. Each cell records its own
//! four walls; the wall between two adjacent cells is therefore stored
//! twice, once on each side. [`Grid::remove_wall_between`] is the only
//! operation that opens a wall and always touches both sides, which keeps
//! the two copies in agreement.
//!
//! Both dimensions are forced odd so a maze with single-cell corridors
//! fits the grid exactly.

use alloc::vec;
use alloc::vec::Vec;

/// Cardinal direction of a wall, relative to the cell that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Right,
    Bottom,
    Left,
}

impl Direction {
    /// All four directions in wall-array order.
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Right,
        Direction::Bottom,
        Direction::Left,
    ];

    /// Index into a cell's wall array.
    pub const fn index(self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Right => 1,
            Direction::Bottom => 2,
            Direction::Left => 3,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Top => Direction::Bottom,
            Direction::Bottom => Direction::Top,
            Direction::Right => Direction::Left,
            Direction::Left => Direction::Right,
        }
    }

    /// Row and column deltas of a single step.
    pub const fn delta(self) -> (isize, isize) {
        match self {
            Direction::Top => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Bottom => (1, 0),
            Direction::Left => (0, -1),
        }
    }
}

/// Cell coordinate, 0-indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Sum of absolute row and column differences.
    pub fn manhattan(self, other: Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// One step in `dir`. No bounds checking: a step off the top or left
    /// edge wraps to a huge index that [`Grid::contains`] rejects.
    pub fn step(self, dir: Direction) -> Coord {
        let (dr, dc) = dir.delta();
        Coord {
            row: self.row.wrapping_add_signed(dr),
            col: self.col.wrapping_add_signed(dc),
        }
    }
}

/// Per-cell wall flags, `true` = wall present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Walls([bool; 4]);

impl Walls {
    pub const fn all() -> Self {
        Walls([true; 4])
    }

    pub fn is_present(&self, dir: Direction) -> bool {
        self.0[dir.index()]
    }

    pub fn set(&mut self, dir: Direction, present: bool) {
        self.0[dir.index()] = present;
    }
}

impl Default for Walls {
    fn default() -> Self {
        Walls::all()
    }
}

/// A single maze cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Cell {
    pub walls: Walls,
    /// Set once the cell has been carved into the spanning tree.
    pub in_maze: bool,
    /// Generation bookkeeping: the cell's boundary walls were pushed to the frontier.
    pub visited: bool,
}

impl Cell {
    /// A blank cell: every wall present, not carved.
    pub const fn blank() -> Self {
        Self {
            walls: Walls::all(),
            in_maze: false,
            visited: false,
        }
    }
}

/// Force a dimension odd by decrementing it, never below 1.
pub fn force_odd(n: usize) -> usize {
    match n {
        0 => 1,
        n if n % 2 == 0 => n - 1,
        n => n,
    }
}

/// The `rows × cols` cell array.
///
/// Allocated once; maze cycles mutate cells in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate a blank grid. Even dimensions are decremented to odd.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = force_odd(rows);
        let cols = force_odd(cols);
        Self {
            rows,
            cols,
            cells: vec![Cell::blank(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Bounds check.
    pub fn is_valid_cell(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.is_valid_cell(c.row, c.col)
    }

    /// Neighbor coordinate in `dir` by pure arithmetic; the caller validates it.
    pub fn neighbor_in_direction(&self, row: usize, col: usize, dir: Direction) -> (usize, usize) {
        let next = Coord::new(row, col).step(dir);
        (next.row, next.col)
    }

    /// Flat index of a valid coordinate.
    pub fn index(&self, c: Coord) -> usize {
        c.row * self.cols + c.col
    }

    /// Coordinate of a flat index.
    pub fn coord(&self, index: usize) -> Coord {
        Coord::new(index / self.cols, index % self.cols)
    }

    pub fn cell(&self, c: Coord) -> &Cell {
        &self.cells[self.index(c)]
    }

    pub fn cell_mut(&mut self, c: Coord) -> &mut Cell {
        let index = self.index(c);
        &mut self.cells[index]
    }

    /// Every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cells.len()).map(move |i| self.coord(i))
    }

    pub fn has_wall(&self, c: Coord, dir: Direction) -> bool {
        self.cell(c).walls.is_present(dir)
    }

    /// Clear the wall on side `dir` of `(row, col)` and the matching wall of
    /// its neighbor. Sides that fall outside the grid are left alone.
    pub fn remove_wall_between(&mut self, row: usize, col: usize, dir: Direction) {
        if self.is_valid_cell(row, col) {
            self.cell_mut(Coord::new(row, col)).walls.set(dir, false);
        }
        let (nr, nc) = self.neighbor_in_direction(row, col, dir);
        if self.is_valid_cell(nr, nc) {
            self.cell_mut(Coord::new(nr, nc)).walls.set(dir.opposite(), false);
        }
    }

    /// In-bounds neighbors reachable through an open wall.
    pub fn passages(&self, c: Coord) -> impl Iterator<Item = Coord> + '_ {
        let walls = self.cell(c).walls;
        Direction::ALL
            .into_iter()
            .filter(move |&dir| !walls.is_present(dir))
            .map(move |dir| c.step(dir))
            .filter(move |&n| self.contains(n))
    }

    /// Reset every cell to blank.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::blank());
    }

    /// Number of open walls between adjacent in-bounds cells (tree edges).
    pub fn passage_count(&self) -> usize {
        self.coords()
            .map(|c| {
                [Direction::Right, Direction::Bottom]
                    .into_iter()
                    .filter(|&dir| self.contains(c.step(dir)) && !self.has_wall(c, dir))
                    .count()
            })
            .sum()
    }

    /// Whether every adjacent pair agrees on the wall between them.
    pub fn walls_symmetric(&self) -> bool {
        self.coords().all(|c| {
            [Direction::Right, Direction::Bottom].into_iter().all(|dir| {
                let n = c.step(dir);
                !self.contains(n) || self.has_wall(c, dir) == self.has_wall(n, dir.opposite())
            })
        })
    }

    /// The four corner cells: top-left, top-right, bottom-left, bottom-right.
    pub fn corners(&self) -> [Coord; 4] {
        let last_row = self.rows - 1;
        let last_col = self.cols - 1;
        [
            Coord::new(0, 0),
            Coord::new(0, last_col),
            Coord::new(last_row, 0),
            Coord::new(last_row, last_col),
        ]
    }

    /// Binary grid of size `(rows*2 + 1) × (cols*2 + 1)`:
    /// - 0 = wall
    /// - 1 = open cell or passage
    ///
    /// Cell centers sit at `(row*2 + 1, col*2 + 1)`.
    pub fn to_binary_grid(&self) -> Vec<Vec<u8>> {
        let mut grid = vec![vec![0u8; self.cols * 2 + 1]; self.rows * 2 + 1];

        for c in self.coords() {
            let cell = self.cell(c);
            let gr = c.row * 2 + 1;
            let gc = c.col * 2 + 1;

            grid[gr][gc] = 1;

            if !cell.walls.is_present(Direction::Top) {
                grid[gr - 1][gc] = 1;
            }
            if !cell.walls.is_present(Direction::Bottom) {
                grid[gr + 1][gc] = 1;
            }
            if !cell.walls.is_present(Direction::Right) {
                grid[gr][gc + 1] = 1;
            }
            if !cell.walls.is_present(Direction::Left) {
                grid[gr][gc - 1] = 1;
            }
        }

        grid
    }

    /// Rebuild a grid from [`Grid::to_binary_grid`] output.
    ///
    /// Returns `None` when the shape is not `(odd*2 + 1) × (odd*2 + 1)` or
    /// rows are ragged. Every cell is marked `in_maze`.
    pub fn from_binary_grid(data: &[Vec<u8>]) -> Option<Grid> {
        let height = data.len();
        let width = data.first()?.len();
        if height < 3 || width < 3 || height % 2 == 0 || width % 2 == 0 {
            return None;
        }
        if data.iter().any(|row| row.len() != width) {
            return None;
        }

        let rows = (height - 1) / 2;
        let cols = (width - 1) / 2;
        if rows % 2 == 0 || cols % 2 == 0 {
            return None;
        }

        let mut grid = Grid::new(rows, cols);
        for c in (0..rows * cols).map(|i| Coord::new(i / cols, i % cols)) {
            let gr = c.row * 2 + 1;
            let gc = c.col * 2 + 1;
            let cell = grid.cell_mut(c);
            cell.in_maze = true;
            cell.walls.set(Direction::Top, data[gr - 1][gc] == 0);
            cell.walls.set(Direction::Bottom, data[gr + 1][gc] == 0);
            cell.walls.set(Direction::Right, data[gr][gc + 1] == 0);
            cell.walls.set(Direction::Left, data[gr][gc - 1] == 0);
        }
        Some(grid)
    }
}
