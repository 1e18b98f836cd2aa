//! Difficulty level and the parameters derived from it

use crate::grid::force_odd;

/// Difficulty from 1 (easy) to 10 (hard).
///
/// Harder levels use smaller cells, so more of them fit a viewport, and
/// demand a longer minimum Start/End distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Smallest and largest minimum Start/End distances.
    pub const MIN_DISTANCE_RANGE: (usize, usize) = (10, 25);

    const LARGEST_CELL: usize = 40;
    const CELL_SHRINK: usize = 3;

    pub fn new(level: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&level).then_some(Difficulty(level))
    }

    pub fn clamped(level: u8) -> Self {
        Difficulty(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Minimum Manhattan distance between Start and End, linear in the
    /// level from 10 at level 1 to 25 at level 10.
    pub fn min_distance(self) -> usize {
        let (low, high) = Self::MIN_DISTANCE_RANGE;
        let steps = (Self::MAX - Self::MIN) as usize;
        low + (self.0 - Self::MIN) as usize * (high - low) / steps
    }

    /// Cell edge length in pixels: 40 at level 1 down to 13 at level 10.
    pub fn cell_size(self) -> usize {
        Self::LARGEST_CELL - (self.0 - Self::MIN) as usize * Self::CELL_SHRINK
    }

    /// Odd `(rows, cols)` that fit a viewport of `width × height` pixels.
    pub fn grid_for_viewport(self, width: usize, height: usize) -> (usize, usize) {
        let cell = self.cell_size();
        (force_odd(height / cell), force_odd(width / cell))
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty(5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Difficulty::new(0).is_none());
        assert!(Difficulty::new(11).is_none());
        assert_eq!(Difficulty::clamped(42).level(), 10);
        assert_eq!(Difficulty::clamped(0).level(), 1);
    }

    #[test]
    fn test_min_distance_range() {
        assert_eq!(Difficulty::clamped(1).min_distance(), 10);
        assert_eq!(Difficulty::clamped(10).min_distance(), 25);
        let mut last = 0;
        for level in 1..=10 {
            let d = Difficulty::clamped(level).min_distance();
            assert!(d >= last);
            last = d;
        }
    }

    #[test]
    fn test_cell_size_and_viewport() {
        assert_eq!(Difficulty::clamped(1).cell_size(), 40);
        assert_eq!(Difficulty::clamped(10).cell_size(), 13);

        // 800x600 at 40px cells: 15 rows, 20 -> 19 cols
        assert_eq!(Difficulty::clamped(1).grid_for_viewport(800, 600), (15, 19));
        // Tiny viewport still yields one cell
        assert_eq!(Difficulty::clamped(1).grid_for_viewport(10, 10), (1, 1));
    }
}
