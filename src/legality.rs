//! Precomputed table of destructive swaps
//!
//! The table reflects the board as of the last `rebuild`. Callers rebuild
//! after every occupancy change before consulting it again.

use crate::coord::{CellPair, Coord, Direction};
use crate::error::BoardError;
use crate::grid::Grid;
use crate::matcher::{DestroyedSet, Matcher};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct LegalityCache {
    swaps: HashMap<CellPair, DestroyedSet>,
}

impl LegalityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute every destructive swap. Each unordered pair is tested once,
    /// from its left or upper cell. Pairs with an empty end are never
    /// swappable and are left out.
    pub fn rebuild(&mut self, grid: &Grid, matcher: &Matcher) -> Result<(), BoardError> {
        self.swaps.clear();
        for cell in grid.level().floor_cells() {
            if !grid.is_occupied(cell) {
                continue;
            }
            for dir in [Direction::Right, Direction::Down] {
                let other = cell.offset(dir);
                if !grid.is_occupied(other) {
                    continue;
                }
                let destroyed = matcher.destroyed_by_swap(grid, cell, other);
                if destroyed.is_empty() {
                    continue;
                }
                let pair = CellPair::new(cell, other);
                if self.swaps.insert(pair, destroyed).is_some() {
                    return Err(BoardError::DuplicateCacheEntry(cell, other));
                }
            }
        }
        Ok(())
    }

    /// What swapping `a` and `b` would destroy, as of the last rebuild
    pub fn is_legal_swap(&self, a: Coord, b: Coord) -> Option<&DestroyedSet> {
        self.swaps.get(&CellPair::new(a, b))
    }

    /// All currently destructive swaps, in a stable order
    pub fn pairs(&self) -> Vec<CellPair> {
        let mut pairs: Vec<_> = self.swaps.keys().copied().collect();
        pairs.sort();
        pairs
    }

    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;

    fn grid(layout: &str) -> Grid {
        let level = Level::parse(layout).unwrap();
        let mut grid = Grid::new(level.clone());
        for &(coord, color) in level.presets() {
            let piece = grid.new_piece(color);
            grid.place(coord, piece).unwrap();
        }
        grid
    }

    #[test]
    fn test_rebuild_finds_strip_swap() {
        let grid = grid("aabaa");
        let mut cache = LegalityCache::new();
        cache.rebuild(&grid, &Matcher::default()).unwrap();
        let a = Coord::new(2, 0);
        let b = Coord::new(3, 0);
        assert!(cache.is_legal_swap(a, b).is_some());
        assert_eq!(cache.is_legal_swap(a, b), cache.is_legal_swap(b, a));
        // Swapping (1,0) and (2,0) gives a b a a a on the right
        assert!(cache.is_legal_swap(Coord::new(1, 0), Coord::new(2, 0)).is_some());
        assert!(cache.is_legal_swap(Coord::new(0, 0), Coord::new(1, 0)).is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_soundness() {
        let grid = grid("abcab\nbcaba\naabcc\ncbaab\nabcca");
        let matcher = Matcher::default();
        let mut cache = LegalityCache::new();
        cache.rebuild(&grid, &matcher).unwrap();
        assert!(!cache.is_empty());

        for cell in grid.level().floor_cells() {
            for dir in [Direction::Right, Direction::Up, Direction::Left, Direction::Down] {
                let other = cell.offset(dir);
                if !grid.is_floor(other) {
                    continue;
                }
                let direct = matcher.destroyed_by_swap(&grid, cell, other);
                match cache.is_legal_swap(cell, other) {
                    Some(cached) => assert_eq!(cached, &direct),
                    None => assert!(direct.is_empty(), "{cell} <-> {other} missing"),
                }
            }
        }
    }

    #[test]
    fn test_rebuild_skips_empty_cells() {
        // Moving the b at (1,0) into the hole at (0,0) would stack three
        // b's, but there is nothing there to swap with
        let grid = grid("b..\nb..\n.bb");
        let mut cache = LegalityCache::new();
        cache.rebuild(&grid, &Matcher::default()).unwrap();
        assert!(cache.is_legal_swap(Coord::new(0, 0), Coord::new(1, 0)).is_none());
        assert!(cache.pairs().iter().all(|p| grid.is_occupied(p.first()) && grid.is_occupied(p.second())));
    }

    #[test]
    fn test_pairs_are_adjacent_and_sorted() {
        let grid = grid("abab\nbaba\nabab");
        let mut cache = LegalityCache::new();
        cache.rebuild(&grid, &Matcher::default()).unwrap();
        let pairs = cache.pairs();
        assert!(pairs.windows(2).all(|w| w[0] < w[1]));
        assert!(pairs.iter().all(|p| p.first().is_adjacent(p.second())));
    }
}
