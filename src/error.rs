//! Error types for the grid store, configuration and board operations

use crate::coord::Coord;
use crate::piece::PieceId;
use thiserror::Error;

/// Violations of the occupancy map's invariants. These are always detected
/// before the map is touched, so a failed call leaves it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {0} is not a floor cell")]
    NotFloor(Coord),
    #[error("cell {0} is already occupied")]
    Occupied(Coord),
    #[error("cell {0} is empty")]
    Empty(Coord),
    #[error("piece {0} is already on the board")]
    DuplicatePiece(PieceId),
}

/// Problems with settings or level data, fatal at board start-up
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("palette is empty")]
    EmptyPalette,
    #[error("palette has {0} entries, at most 256 are supported")]
    PaletteTooLarge(usize),
    #[error("invalid palette color {0:?}")]
    InvalidColor(String),
    #[error("matching_blocks_needed must be at least 2, got {0}")]
    MatchLengthTooShort(usize),
    #[error("level layout is empty")]
    EmptyLayout,
    #[error("unknown tile {ch:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, ch: char },
    #[error("level has no floor tiles")]
    NoFloor,
    #[error("level has no wall tiles")]
    NoWall,
    #[error("column {0} has floor cells but no spawn point")]
    NoSpawnPoint(i32),
    #[error("floor cell {0} lies above its column's spawn point")]
    FloorAboveSpawn(Coord),
    #[error("preset piece at {coord} uses color {color} outside a palette of {palette_len}")]
    PresetOutsidePalette {
        coord: Coord,
        color: usize,
        palette_len: usize,
    },
}

/// Errors that abort a board operation
#[derive(Debug, Error)]
pub enum BoardError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("interaction lock released while not held")]
    LockNotHeld,
    #[error("interaction lock held during start-up")]
    LockHeldAtStart,
    #[error("swap {0} <-> {1} recorded twice in the legality cache")]
    DuplicateCacheEntry(Coord, Coord),
    #[error("piece {0} has no visual")]
    MissingVisual(PieceId),
}
