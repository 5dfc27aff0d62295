//! Grid coordinates
//!
//! Row 0 is the bottom row and `y` increases upward, so "below" is `y - 1`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell position on the grid. Any pair of integers is a coordinate;
/// whether it is on the board is decided by the level bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn below(self) -> Self {
        self.offset(Direction::Down)
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// True when the two cells share an edge
    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four axis-aligned directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Dominant direction of a drag delta. Any horizontal movement wins;
    /// a zero delta has no direction.
    pub fn dominant(dx: i32, dy: i32) -> Option<Self> {
        if dx.abs() >= 1 {
            Some(if dx > 0 { Direction::Right } else { Direction::Left })
        } else if dy != 0 {
            Some(if dy > 0 { Direction::Up } else { Direction::Down })
        } else {
            None
        }
    }
}

/// An unordered pair of cells, stored with the smaller coordinate first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPair {
    first: Coord,
    second: Coord,
}

impl CellPair {
    pub fn new(a: Coord, b: Coord) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> Coord {
        self.first
    }

    pub fn second(&self) -> Coord {
        self.second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency() {
        let c = Coord::new(2, 3);
        assert!(c.is_adjacent(Coord::new(3, 3)));
        assert!(c.is_adjacent(Coord::new(2, 2)));
        assert!(!c.is_adjacent(c));
        assert!(!c.is_adjacent(Coord::new(3, 4)));
        assert!(!c.is_adjacent(Coord::new(4, 3)));
    }

    #[test]
    fn test_below_is_lower_row() {
        assert_eq!(Coord::new(1, 5).below(), Coord::new(1, 4));
    }

    #[test]
    fn test_dominant_direction_prefers_horizontal() {
        assert_eq!(Direction::dominant(1, 5), Some(Direction::Right));
        assert_eq!(Direction::dominant(-3, -1), Some(Direction::Left));
        assert_eq!(Direction::dominant(0, -2), Some(Direction::Down));
        assert_eq!(Direction::dominant(0, 4), Some(Direction::Up));
        assert_eq!(Direction::dominant(0, 0), None);
    }

    #[test]
    fn test_cell_pair_is_unordered() {
        let a = Coord::new(0, 0);
        let b = Coord::new(1, 0);
        assert_eq!(CellPair::new(a, b), CellPair::new(b, a));
        assert_eq!(CellPair::new(b, a).first(), a);
    }
}
