//! Removal, refill and gravity after a destructive swap
//!
//! Map updates happen synchronously under the state mutex; the matching
//! animations run afterwards as one joined group per step.

use crate::board::{BoardState, Inner};
use crate::coord::Coord;
use crate::error::{BoardError, GridError};
use crate::grid::Grid;
use crate::level::{CellKind, Level};
use crate::matcher::DestroyedSet;
use crate::piece::Piece;
use crate::presenter::Presenter;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

/// A committed move of one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fall {
    pub piece: Piece,
    pub from: Coord,
    pub to: Coord,
}

impl Fall {
    pub fn distance(&self) -> u32 {
        self.from.y.abs_diff(self.to.y)
    }
}

/// Outcome of settling one column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSettle {
    pub falls: Vec<Fall>,
    /// Spawned pieces that could not reach any floor cell
    pub stranded: Vec<(Coord, Piece)>,
}

/// Summary of one cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub destroyed: usize,
    pub spawned: usize,
    pub fell: usize,
    pub stranded: usize,
}

/// Where a piece at `from` comes to rest.
///
/// The piece walks down while the cell below is neither blocked nor under
/// the bottom row. Each non-floor cell passed, wall or gap, costs one unit
/// of `fall_through_walls`; each floor passed restores it. A piece starting
/// off the floor (a freshly spawned one, possibly above the level) falls
/// without limit until it first reaches floor. The result is the last floor
/// cell reached, or `None` if the piece never reached one.
pub fn fall_position(
    level: &Level,
    from: Coord,
    fall_through_walls: u32,
    is_blocked: impl Fn(Coord) -> bool,
) -> Option<Coord> {
    let mut last_floor = level.is_floor(from).then_some(from);
    // None while unlimited
    let mut budget = last_floor.map(|_| fall_through_walls);
    let mut cursor = from;

    loop {
        let below = cursor.below();
        if below.y < 0 || is_blocked(below) {
            break;
        }
        match level.kind_of(below) {
            CellKind::Floor => {
                last_floor = Some(below);
                budget = Some(fall_through_walls);
            }
            CellKind::Wall | CellKind::OutOfBounds => match budget {
                Some(0) => break,
                Some(n) => budget = Some(n - 1),
                None => {}
            },
        }
        cursor = below;
    }

    last_floor
}

/// Let everything in column `x` fall, bottom to top: first the pieces on
/// the board, then the `staged` pieces waiting above the column.
pub fn settle_column(
    grid: &mut Grid,
    x: i32,
    mut staged: Vec<(Coord, Piece)>,
    fall_through_walls: u32,
) -> Result<ColumnSettle, GridError> {
    let mut settle = ColumnSettle::default();

    for y in 0..grid.level().height() {
        let from = Coord::new(x, y);
        let Some(piece) = grid.piece_at(from) else {
            continue;
        };
        let to = fall_position(grid.level(), from, fall_through_walls, |c| grid.is_occupied(c))
            .unwrap_or(from);
        if to != from {
            grid.move_piece(from, to)?;
            settle.falls.push(Fall { piece, from, to });
        }
    }

    staged.sort_by_key(|(coord, _)| coord.y);
    for (from, piece) in staged {
        match fall_position(grid.level(), from, fall_through_walls, |c| grid.is_occupied(c)) {
            Some(to) => {
                grid.place(to, piece)?;
                settle.falls.push(Fall { piece, from, to });
            }
            None => settle.stranded.push((from, piece)),
        }
    }

    Ok(settle)
}

/// Spawn one piece per empty floor cell of column `x`, stacked upward from
/// the column's spawn point. Spawned pieces may form matches.
fn stage_column<P: Presenter>(
    state: &mut BoardState<P::Visual>,
    presenter: &P,
    x: i32,
) -> Vec<(Coord, Piece)> {
    let Some(spawn) = state.grid.level().spawn_point(x) else {
        warn!("Column {} has no spawn point, leaving it unfilled", x);
        return Vec::new();
    };
    let count = state.grid.count_empty_floor(x);
    let mut staged = Vec::with_capacity(count);
    for i in 0..count {
        let coord = Coord::new(x, spawn.y + i as i32);
        let color = state.spawner.random_color();
        let piece = state.grid.new_piece(color);
        let visual = presenter.spawn_visual(color, presenter.cell_center(coord));
        state.visuals.insert(piece.id, visual);
        staged.push((coord, piece));
    }
    staged
}

/// Wait for every task in the group
pub(crate) async fn join_all(mut tasks: JoinSet<()>) {
    while let Some(result) = tasks.join_next().await {
        if let Err(e) = result {
            error!("Animation task failed: {}", e);
        }
    }
}

/// Destroy the matched pieces, then refill and settle every touched column
pub(crate) async fn resolve<P: Presenter>(
    inner: &Inner<P>,
    destroyed: &DestroyedSet,
) -> Result<CascadeReport, BoardError> {
    let mut report = CascadeReport {
        destroyed: destroyed.len(),
        ..CascadeReport::default()
    };

    // Take the pieces off the map. Everything is checked before anything
    // is removed.
    let doomed = {
        let mut state = inner.state();
        let st = &mut *state;
        for &coord in destroyed {
            let piece = st.grid.piece_at(coord).ok_or(GridError::Empty(coord))?;
            if !st.visuals.contains_key(&piece.id) {
                return Err(BoardError::MissingVisual(piece.id));
            }
        }
        let mut doomed = Vec::with_capacity(destroyed.len());
        for &coord in destroyed {
            let piece = st.grid.remove(coord)?;
            if let Some(visual) = st.visuals.remove(&piece.id) {
                doomed.push(visual);
            }
        }
        doomed
    };

    let mut tasks = JoinSet::new();
    for visual in doomed {
        let presenter = Arc::clone(&inner.presenter);
        tasks.spawn(async move { presenter.destroy_visual(visual).await });
    }
    join_all(tasks).await;
    tokio::time::sleep(inner.timing.delay_after_destroy()).await;

    // Refill then fall, column by column; animations of all columns run
    // together afterwards
    let columns: BTreeSet<i32> = destroyed.iter().map(|c| c.x).collect();
    let mut moves = Vec::new();
    let mut stranded = Vec::new();
    {
        let mut state = inner.state();
        let st = &mut *state;
        for x in columns {
            let staged = stage_column(st, inner.presenter.as_ref(), x);
            report.spawned += staged.len();
            let settle = settle_column(&mut st.grid, x, staged, inner.fall_through_walls)?;
            debug!(
                "Column {}: {} falls, {} stranded",
                x,
                settle.falls.len(),
                settle.stranded.len()
            );
            for fall in settle.falls {
                let visual = st
                    .visuals
                    .get(&fall.piece.id)
                    .cloned()
                    .ok_or(BoardError::MissingVisual(fall.piece.id))?;
                moves.push((visual, fall));
            }
            for (coord, piece) in settle.stranded {
                warn!("{} spawned at {} cannot reach a floor cell, dropping it", piece.id, coord);
                if let Some(visual) = st.visuals.remove(&piece.id) {
                    stranded.push(visual);
                }
            }
        }
    }
    report.fell = moves.len();
    report.stranded = stranded.len();

    let mut tasks = JoinSet::new();
    for (visual, fall) in moves {
        let presenter = Arc::clone(&inner.presenter);
        let target = presenter.cell_center(fall.to);
        let duration = inner.timing.fall_time(fall.distance());
        let easing = inner.timing.fall_easing;
        tasks.spawn(async move {
            presenter.move_visual(&visual, target, easing, duration).await;
        });
    }
    for visual in stranded {
        let presenter = Arc::clone(&inner.presenter);
        tasks.spawn(async move { presenter.destroy_visual(visual).await });
    }
    join_all(tasks).await;

    Ok(report)
}
