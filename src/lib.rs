//! matchgrid - a match-3 grid engine
//!
//! Pieces sit on the floor cells of an authored level. Swapping two
//! neighbours that completes a run destroys the run; the emptied columns
//! refill from their spawn points and everything falls into place, with
//! every step paced by awaited animations from a [`Presenter`].

pub mod board;
pub mod cascade;
pub mod coord;
pub mod error;
pub mod grid;
pub mod input;
pub mod legality;
pub mod level;
pub mod lock;
pub mod matcher;
pub mod piece;
pub mod presenter;
pub mod settings;
pub mod spawner;

pub use board::{Board, BoardSnapshot, FillOutcome, RejectReason, SwapOutcome};
pub use coord::{CellPair, Coord, Direction};
pub use error::{BoardError, ConfigError, GridError};
pub use input::{SwapGesture, SwapRequest};
pub use level::{CellKind, Level};
pub use piece::{Piece, PieceColor, PieceId};
pub use presenter::{Easing, HeadlessPresenter, Presenter, Vec2};
pub use settings::Settings;
