//! Level data: tile classification authored as an ASCII layout
//!
//! The first line of a layout is the top row. Tiles:
//! `#` wall, `.` floor, space or `~` outside the level,
//! `a`..`z` floor holding a preset piece of palette color 0..25.

use crate::coord::Coord;
use crate::error::ConfigError;
use crate::piece::PieceColor;
use serde::{Deserialize, Serialize};

/// Classification of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Floor,
    OutOfBounds,
}

/// Immutable tile map of a level plus the pieces it starts with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    width: i32,
    height: i32,
    /// Row-major, row 0 is the bottom row
    tiles: Vec<CellKind>,
    presets: Vec<(Coord, PieceColor)>,
}

impl Level {
    /// Parse an ASCII layout. Leading and trailing blank lines are ignored;
    /// short lines are padded with out-of-bounds cells.
    pub fn parse(layout: &str) -> Result<Self, ConfigError> {
        let lines: Vec<&str> = layout.lines().collect();
        let first = lines.iter().position(|l| !l.trim().is_empty());
        let last = lines.iter().rposition(|l| !l.trim().is_empty());
        let (Some(first), Some(last)) = (first, last) else {
            return Err(ConfigError::EmptyLayout);
        };
        let rows = &lines[first..=last];

        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut tiles = vec![CellKind::OutOfBounds; width * height];
        let mut presets = Vec::new();

        for (row, line) in rows.iter().enumerate() {
            let y = (height - 1 - row) as i32;
            for (col, ch) in line.chars().enumerate() {
                let kind = match ch {
                    '#' => CellKind::Wall,
                    '.' => CellKind::Floor,
                    ' ' | '~' => CellKind::OutOfBounds,
                    'a'..='z' => {
                        let color = PieceColor(ch as u8 - b'a');
                        presets.push((Coord::new(col as i32, y), color));
                        CellKind::Floor
                    }
                    _ => return Err(ConfigError::UnknownTile { row, col, ch }),
                };
                tiles[y as usize * width + col] = kind;
            }
        }

        Ok(Self {
            width: width as i32,
            height: height as i32,
            tiles,
            presets,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.y)
    }

    pub fn kind_of(&self, coord: Coord) -> CellKind {
        if !self.contains(coord) {
            return CellKind::OutOfBounds;
        }
        self.tiles[(coord.y * self.width + coord.x) as usize]
    }

    pub fn is_floor(&self, coord: Coord) -> bool {
        self.kind_of(coord) == CellKind::Floor
    }

    pub fn is_wall(&self, coord: Coord) -> bool {
        self.kind_of(coord) == CellKind::Wall
    }

    /// Pieces authored into the layout
    pub fn presets(&self) -> &[(Coord, PieceColor)] {
        &self.presets
    }

    /// Every in-bounds coordinate, top row to bottom row, left to right
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height)
            .rev()
            .flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// Floor coordinates in the fixed fill order
    pub fn floor_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells().filter(move |&c| self.is_floor(c))
    }

    /// Where replacement pieces for column `x` enter: scanning down from the
    /// top, the first wall with a floor cell directly below it.
    pub fn spawn_point(&self, x: i32) -> Option<Coord> {
        (0..self.height)
            .rev()
            .map(|y| Coord::new(x, y))
            .find(|&c| self.is_wall(c) && self.is_floor(c.below()))
    }

    /// Checks that a board can be started on this level
    pub fn validate(&self, palette_len: usize) -> Result<(), ConfigError> {
        if !self.tiles.contains(&CellKind::Floor) {
            return Err(ConfigError::NoFloor);
        }
        if !self.tiles.contains(&CellKind::Wall) {
            return Err(ConfigError::NoWall);
        }
        for x in 0..self.width {
            let has_floor = (0..self.height).any(|y| self.is_floor(Coord::new(x, y)));
            if !has_floor {
                continue;
            }
            let spawn = self.spawn_point(x).ok_or(ConfigError::NoSpawnPoint(x))?;
            // Cells above the spawn point are where refills wait
            if let Some(y) = (spawn.y + 1..self.height).find(|&y| self.is_floor(Coord::new(x, y))) {
                return Err(ConfigError::FloorAboveSpawn(Coord::new(x, y)));
            }
        }
        if let Some(&(coord, color)) = self.presets.iter().find(|(_, c)| c.index() >= palette_len)
        {
            return Err(ConfigError::PresetOutsidePalette {
                coord,
                color: color.index(),
                palette_len,
            });
        }
        Ok(())
    }
}
