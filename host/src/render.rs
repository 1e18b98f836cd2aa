//! Renderer collaborators
//!
//! The runner only emits [`MazeEvent`]s. [`TracingSink`] logs them;
//! [`AsciiCanvas`] rebuilds a picture from them and draws it as text.

use maze_core::{Coord, MazeEvent, MazeSink, Tag};

/// Logs every event at `trace` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl MazeSink for TracingSink {
    fn notify(&mut self, event: MazeEvent) {
        match event {
            MazeEvent::WallRemoved(a, b) => {
                tracing::trace!("wall removed ({},{})-({},{})", a.row, a.col, b.row, b.col)
            }
            MazeEvent::CellMarked(c, tag) => tracing::trace!("mark {:?} at ({},{})", tag, c.row, c.col),
            MazeEvent::CellUnmarked(c, tag) => {
                tracing::trace!("unmark {:?} at ({},{})", tag, c.row, c.col)
            }
            MazeEvent::GridResized { rows, cols, cell_size } => {
                tracing::trace!("grid resized to {}x{} ({}px cells)", rows, cols, cell_size)
            }
            MazeEvent::WallsRestored { keep } => tracing::trace!("walls restored, keep {:?}", keep),
        }
    }
}

const fn tag_bit(tag: Tag) -> u8 {
    match tag {
        Tag::Visited => 1,
        Tag::Path => 2,
        Tag::Start => 4,
        Tag::End => 8,
    }
}

/// Text picture of the maze kept current from events.
///
/// Uses the binary-grid layout: `(rows*2 + 1) × (cols*2 + 1)` characters,
/// cell centers at odd positions.
#[derive(Clone, Debug, Default)]
pub struct AsciiCanvas {
    rows: usize,
    cols: usize,
    open: Vec<Vec<bool>>,
    marks: Vec<u8>,
}

impl AsciiCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_marked(&self, c: Coord, tag: Tag) -> bool {
        self.mark_index(c)
            .map(|i| self.marks[i] & tag_bit(tag) != 0)
            .unwrap_or(false)
    }

    /// Cells currently carrying `tag`, in row-major order.
    pub fn marked(&self, tag: Tag) -> Vec<Coord> {
        (0..self.marks.len())
            .filter(|&i| self.marks[i] & tag_bit(tag) != 0)
            .map(|i| Coord::new(i / self.cols, i % self.cols))
            .collect()
    }

    fn mark_index(&self, c: Coord) -> Option<usize> {
        (c.row < self.rows && c.col < self.cols).then(|| c.row * self.cols + c.col)
    }

    fn resize(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;
        self.marks = vec![0; rows * cols];
        self.restore_walls();
    }

    fn restore_walls(&mut self) {
        self.open = vec![vec![false; self.cols * 2 + 1]; self.rows * 2 + 1];
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.open[row * 2 + 1][col * 2 + 1] = true;
            }
        }
    }

    /// Draw the picture: `#` wall, `S` start, `E` end, `*` path, `.` visited.
    pub fn draw(&self) -> String {
        let mut out = String::with_capacity(self.open.len() * (self.cols * 2 + 2));
        for (gr, line) in self.open.iter().enumerate() {
            for (gc, &open) in line.iter().enumerate() {
                let ch = if !open {
                    '#'
                } else if gr % 2 == 1 && gc % 2 == 1 {
                    self.cell_char(Coord::new(gr / 2, gc / 2))
                } else {
                    ' '
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }

    fn cell_char(&self, c: Coord) -> char {
        if self.is_marked(c, Tag::Start) {
            'S'
        } else if self.is_marked(c, Tag::End) {
            'E'
        } else if self.is_marked(c, Tag::Path) {
            '*'
        } else if self.is_marked(c, Tag::Visited) {
            '.'
        } else {
            ' '
        }
    }
}

impl MazeSink for AsciiCanvas {
    fn notify(&mut self, event: MazeEvent) {
        match event {
            MazeEvent::GridResized { rows, cols, .. } => self.resize(rows, cols),
            MazeEvent::WallsRestored { .. } => self.restore_walls(),
            MazeEvent::WallRemoved(a, b) => {
                if self.mark_index(a).is_some() && self.mark_index(b).is_some() {
                    // Between two cell centers in binary-grid coordinates
                    self.open[a.row + b.row + 1][a.col + b.col + 1] = true;
                }
            }
            MazeEvent::CellMarked(c, tag) => {
                if let Some(i) = self.mark_index(c) {
                    self.marks[i] |= tag_bit(tag);
                }
            }
            MazeEvent::CellUnmarked(c, tag) => {
                if let Some(i) = self.mark_index(c) {
                    self.marks[i] &= !tag_bit(tag);
                }
            }
        }
    }
}
