//! Select/hover gesture to swap request translation
//!
//! Pure state machine with no clock or terminal dependency: the frontend
//! feeds it select, release and hover events in board coordinates and gets
//! back at most one swap request per grab.

use crate::coord::{Coord, Direction};

/// Two neighbouring cells whose pieces should trade places
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapRequest {
    pub from: Coord,
    pub to: Coord,
}

#[derive(Debug, Clone, Default)]
pub struct SwapGesture {
    /// Cell grabbed by the last select, if any
    grabbed: Option<Coord>,
    /// Last hovered cell
    hover: Option<Coord>,
}

impl SwapGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grabbed(&self) -> Option<Coord> {
        self.grabbed
    }

    pub fn hover(&self) -> Option<Coord> {
        self.hover
    }

    /// Grab the cell under the pointer. Ignored while the board is locked.
    pub fn on_select(&mut self, coord: Coord, locked: bool) {
        self.hover = Some(coord);
        if locked {
            return;
        }
        self.grabbed = Some(coord);
    }

    /// Let go without swapping
    pub fn on_release(&mut self) {
        self.grabbed = None;
    }

    /// Pointer moved onto `coord`. Leaving the grabbed cell yields a swap
    /// with its neighbour in the dominant direction of the movement, and
    /// ends the grab.
    pub fn on_hover(&mut self, coord: Coord, locked: bool) -> Option<SwapRequest> {
        self.hover = Some(coord);
        let from = self.grabbed?;
        if locked {
            self.grabbed = None;
            return None;
        }
        let dir = Direction::dominant(coord.x - from.x, coord.y - from.y)?;
        self.grabbed = None;
        Some(SwapRequest {
            from,
            to: from.offset(dir),
        })
    }
}
