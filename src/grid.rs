//! Board occupancy and cell classification
//!
//! The store never locks anything itself: callers mutate it only while
//! holding the board's interaction lock.

use crate::coord::Coord;
use crate::error::GridError;
use crate::level::{CellKind, Level};
use crate::piece::{Piece, PieceColor, PieceId};
use std::collections::{BTreeMap, HashMap};

/// Occupancy map over the floor cells of a level
#[derive(Debug, Clone)]
pub struct Grid {
    level: Level,
    pieces: HashMap<Coord, Piece>,
    /// Reverse index, keeps piece identities unique on the board
    positions: HashMap<PieceId, Coord>,
    next_id: u64,
}

impl Grid {
    /// Create an empty grid for a level
    pub fn new(level: Level) -> Self {
        Self {
            level,
            pieces: HashMap::new(),
            positions: HashMap::new(),
            next_id: 0,
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn kind_of(&self, coord: Coord) -> CellKind {
        self.level.kind_of(coord)
    }

    pub fn is_floor(&self, coord: Coord) -> bool {
        self.level.is_floor(coord)
    }

    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.pieces.get(&coord).copied()
    }

    pub fn color_at(&self, coord: Coord) -> Option<PieceColor> {
        self.pieces.get(&coord).map(|p| p.color)
    }

    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.pieces.contains_key(&coord)
    }

    /// Where a piece currently sits, if it is on the board
    pub fn position_of(&self, id: PieceId) -> Option<Coord> {
        self.positions.get(&id).copied()
    }

    /// Mint a piece that is not yet on the board
    pub fn new_piece(&mut self, color: PieceColor) -> Piece {
        let id = PieceId(self.next_id);
        self.next_id += 1;
        Piece { id, color }
    }

    /// Put a piece on an empty floor cell
    pub fn place(&mut self, coord: Coord, piece: Piece) -> Result<(), GridError> {
        if !self.is_floor(coord) {
            return Err(GridError::NotFloor(coord));
        }
        if self.pieces.contains_key(&coord) {
            return Err(GridError::Occupied(coord));
        }
        if self.positions.contains_key(&piece.id) {
            return Err(GridError::DuplicatePiece(piece.id));
        }
        self.pieces.insert(coord, piece);
        self.positions.insert(piece.id, coord);
        Ok(())
    }

    /// Take the piece off a cell
    pub fn remove(&mut self, coord: Coord) -> Result<Piece, GridError> {
        let piece = self.pieces.remove(&coord).ok_or(GridError::Empty(coord))?;
        self.positions.remove(&piece.id);
        Ok(piece)
    }

    /// Move a piece to an empty floor cell
    pub fn move_piece(&mut self, from: Coord, to: Coord) -> Result<Piece, GridError> {
        if from == to {
            return self.piece_at(from).ok_or(GridError::Empty(from));
        }
        if !self.is_occupied(from) {
            return Err(GridError::Empty(from));
        }
        if !self.is_floor(to) {
            return Err(GridError::NotFloor(to));
        }
        if self.is_occupied(to) {
            return Err(GridError::Occupied(to));
        }
        let piece = self.remove(from)?;
        self.place(to, piece)?;
        Ok(piece)
    }

    /// Exchange the pieces of two occupied floor cells
    pub fn swap(&mut self, a: Coord, b: Coord) -> Result<(), GridError> {
        let pa = self.piece_at(a).ok_or(GridError::Empty(a))?;
        let pb = self.piece_at(b).ok_or(GridError::Empty(b))?;
        self.pieces.insert(a, pb);
        self.pieces.insert(b, pa);
        self.positions.insert(pb.id, a);
        self.positions.insert(pa.id, b);
        Ok(())
    }

    /// Number of empty floor cells in a column
    pub fn count_empty_floor(&self, x: i32) -> usize {
        (0..self.level.height())
            .map(|y| Coord::new(x, y))
            .filter(|&c| self.is_floor(c) && !self.is_occupied(c))
            .count()
    }

    /// Number of pieces on the board
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// True when every floor cell holds a piece
    pub fn is_full(&self) -> bool {
        self.level.floor_cells().all(|c| self.is_occupied(c))
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.pieces.iter().map(|(&c, &p)| (c, p))
    }

    /// Coordinate to color snapshot, ordered for stable output
    pub fn occupancy(&self) -> BTreeMap<Coord, PieceColor> {
        self.pieces.iter().map(|(&c, p)| (c, p.color)).collect()
    }
}
