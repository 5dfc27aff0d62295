//! Match detection over real or hypothetical arrangements of colors
//!
//! Everything here is pure: hypothetical swaps and spawns are evaluated by
//! layering a few overridden colors on top of an immutable base lookup.

use crate::coord::{Coord, Direction};
use crate::grid::Grid;
use crate::level::CellKind;
use crate::piece::PieceColor;
use std::collections::BTreeSet;

/// Coordinates that a match would destroy
pub type DestroyedSet = BTreeSet<Coord>;

/// Read access to cell kinds and piece colors
pub trait ColorLookup {
    fn kind_of(&self, coord: Coord) -> CellKind;
    fn color_at(&self, coord: Coord) -> Option<PieceColor>;
}

impl ColorLookup for Grid {
    fn kind_of(&self, coord: Coord) -> CellKind {
        Grid::kind_of(self, coord)
    }

    fn color_at(&self, coord: Coord) -> Option<PieceColor> {
        Grid::color_at(self, coord)
    }
}

/// A base lookup with some cells' colors replaced. Overrides always win,
/// so every comparison sees the hypothetical value for an overridden cell.
#[derive(Debug)]
pub struct Overridden<'a, L: ?Sized> {
    base: &'a L,
    overrides: Vec<(Coord, Option<PieceColor>)>,
}

impl<'a, L: ColorLookup + ?Sized> Overridden<'a, L> {
    pub fn new(base: &'a L) -> Self {
        Self {
            base,
            overrides: Vec::with_capacity(2),
        }
    }

    pub fn with(mut self, coord: Coord, color: Option<PieceColor>) -> Self {
        self.overrides.retain(|(c, _)| *c != coord);
        self.overrides.push((coord, color));
        self
    }
}

impl<L: ColorLookup + ?Sized> ColorLookup for Overridden<'_, L> {
    fn kind_of(&self, coord: Coord) -> CellKind {
        self.base.kind_of(coord)
    }

    fn color_at(&self, coord: Coord) -> Option<PieceColor> {
        match self.overrides.iter().find(|(c, _)| *c == coord) {
            Some(&(_, color)) => color,
            None => self.base.color_at(coord),
        }
    }
}

/// Finds runs of equal colors at least `min_run` long
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Matcher {
    min_run: usize,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Matcher {
    pub fn new(min_run: usize) -> Self {
        Self { min_run }
    }

    /// Cells destroyed by the runs passing through `origin`. Horizontal and
    /// vertical runs count separately and are merged.
    pub fn destroyed_at<L: ColorLookup + ?Sized>(&self, lookup: &L, origin: Coord) -> DestroyedSet {
        let mut destroyed = DestroyedSet::new();
        if lookup.kind_of(origin) != CellKind::Floor {
            return destroyed;
        }
        // An empty cell never matches, not even another empty cell
        let Some(color) = lookup.color_at(origin) else {
            return destroyed;
        };

        for axis in [Direction::Right, Direction::Up] {
            let run = Self::run(lookup, origin, color, axis);
            if run.len() >= self.min_run {
                destroyed.extend(run);
            }
        }
        destroyed
    }

    /// Cells destroyed if the pieces at `a` and `b` traded places. A match
    /// at either end counts.
    pub fn destroyed_by_swap<L: ColorLookup + ?Sized>(
        &self,
        lookup: &L,
        a: Coord,
        b: Coord,
    ) -> DestroyedSet {
        if lookup.kind_of(a) != CellKind::Floor || lookup.kind_of(b) != CellKind::Floor {
            return DestroyedSet::new();
        }
        let swapped = Overridden::new(lookup)
            .with(a, lookup.color_at(b))
            .with(b, lookup.color_at(a));
        let mut destroyed = self.destroyed_at(&swapped, a);
        destroyed.extend(self.destroyed_at(&swapped, b));
        destroyed
    }

    /// Cells destroyed if a piece of `color` appeared at `at`
    pub fn destroyed_by_spawn<L: ColorLookup + ?Sized>(
        &self,
        lookup: &L,
        at: Coord,
        color: PieceColor,
    ) -> DestroyedSet {
        let spawned = Overridden::new(lookup).with(at, Some(color));
        self.destroyed_at(&spawned, at)
    }

    /// Every cell currently part of a qualifying run
    pub fn all_matches(&self, grid: &Grid) -> DestroyedSet {
        grid.level()
            .floor_cells()
            .flat_map(|c| self.destroyed_at(grid, c))
            .collect()
    }

    /// The full run through `origin` along one axis, origin included
    fn run<L: ColorLookup + ?Sized>(
        lookup: &L,
        origin: Coord,
        color: PieceColor,
        axis: Direction,
    ) -> Vec<Coord> {
        let mut run = vec![origin];
        for dir in [axis, axis.opposite()] {
            let mut cursor = origin.offset(dir);
            while lookup.kind_of(cursor) == CellKind::Floor && lookup.color_at(cursor) == Some(color) {
                run.push(cursor);
                cursor = cursor.offset(dir);
            }
        }
        run
    }
}
