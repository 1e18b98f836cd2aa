//! Renderer notifications
//!
//! The generator, solver and orchestrator report every visible state change
//! as a [`MazeEvent`] to a [`MazeSink`]. Drawing is left entirely to the sink.

use alloc::vec::Vec;

use crate::grid::Coord;

/// Decoration a renderer can attach to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    Visited,
    Path,
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeEvent {
    /// The wall between two adjacent cells was opened.
    WallRemoved(Coord, Coord),
    CellMarked(Coord, Tag),
    CellUnmarked(Coord, Tag),
    /// The grid was rebuilt with new dimensions.
    GridResized {
        rows: usize,
        cols: usize,
        cell_size: usize,
    },
    /// Every wall was restored and every cell uncarved, except that
    /// `keep` stays carved.
    WallsRestored { keep: Option<Coord> },
}

/// Receiver of [`MazeEvent`]s.
pub trait MazeSink {
    fn notify(&mut self, event: MazeEvent);
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl MazeSink for NullSink {
    fn notify(&mut self, _event: MazeEvent) {}
}

/// Records events in order.
impl MazeSink for Vec<MazeEvent> {
    fn notify(&mut self, event: MazeEvent) {
        self.push(event);
    }
}

impl<S: MazeSink + ?Sized> MazeSink for &mut S {
    fn notify(&mut self, event: MazeEvent) {
        (**self).notify(event);
    }
}

/// Fan out to two sinks.
impl<A: MazeSink, B: MazeSink> MazeSink for (A, B) {
    fn notify(&mut self, event: MazeEvent) {
        self.0.notify(event);
        self.1.notify(event);
    }
}
