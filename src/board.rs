//! The board engine: initial fill, swaps and their cascades
//!
//! A [`Board`] is a cheap cloneable handle. Every mutating operation first
//! takes the non-blocking interaction lock, so at most one fill or swap is
//! in flight per board; a request arriving while another runs is dropped.
//! Read-only queries are served at any time and reflect the last rebuild.

use crate::cascade::{self, CascadeReport};
use crate::coord::{CellPair, Coord};
use crate::error::{BoardError, GridError};
use crate::grid::Grid;
use crate::legality::LegalityCache;
use crate::level::Level;
use crate::lock::InteractionLock;
use crate::matcher::{DestroyedSet, Matcher};
use crate::piece::{Piece, PieceColor, PieceId};
use crate::presenter::{Easing, Presenter};
use crate::settings::{Settings, TimingSettings};
use crate::spawner::Spawner;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why a swap request was turned down without touching the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("both cells are the same")]
    SameCell,
    #[error("cells are not neighbours")]
    NotAdjacent,
    #[error("cell {0} is not a floor cell")]
    NotFloor(Coord),
    #[error("cell {0} holds no piece")]
    Empty(Coord),
}

/// Result of one swap attempt
#[derive(Debug)]
pub enum SwapOutcome {
    /// The swap matched; `destroyed` were removed and the columns refilled
    Resolved {
        destroyed: DestroyedSet,
        cascade: CascadeReport,
    },
    /// Nothing matched, the pieces went back
    Reverted,
    Rejected(RejectReason),
    /// Another operation holds the board
    Busy,
    Aborted(BoardError),
}

impl SwapOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, SwapOutcome::Resolved { .. })
    }
}

/// Result of the initial fill
#[derive(Debug)]
pub enum FillOutcome {
    Filled {
        spawned: usize,
        /// Spawns where every palette color completed a run
        forced_matches: usize,
    },
    Busy,
    Aborted(BoardError),
}

/// Serializable view of the board for logs and debug overlays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub width: i32,
    pub height: i32,
    pub locked: bool,
    pub pieces: Vec<SnapshotPiece>,
    pub legal_swaps: Vec<CellPair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnapshotPiece {
    pub x: i32,
    pub y: i32,
    pub color: PieceColor,
}

impl BoardSnapshot {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Mutable board data, guarded by one mutex that is never held across an
/// await point
#[derive(Debug)]
pub(crate) struct BoardState<V> {
    pub(crate) grid: Grid,
    pub(crate) legality: LegalityCache,
    pub(crate) visuals: HashMap<PieceId, V>,
    pub(crate) spawner: Spawner,
}

pub(crate) struct Inner<P: Presenter> {
    pub(crate) matcher: Matcher,
    pub(crate) timing: TimingSettings,
    pub(crate) fall_through_walls: u32,
    pub(crate) lock: InteractionLock,
    pub(crate) presenter: Arc<P>,
    pub(crate) level: Level,
    state: Mutex<BoardState<P::Visual>>,
}

impl<P: Presenter> Inner<P> {
    pub(crate) fn state(&self) -> MutexGuard<'_, BoardState<P::Visual>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct Board<P: Presenter> {
    inner: Arc<Inner<P>>,
}

impl<P: Presenter> Clone for Board<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Presenter> Board<P> {
    /// Validate the settings and create an empty board. Nothing is spawned
    /// until [`Board::initial_fill`] runs.
    pub fn new(settings: &Settings, presenter: Arc<P>) -> Result<Self, BoardError> {
        let level = settings.validate()?;
        let seed = settings.rules.seed.unwrap_or_else(rand::random);
        info!(
            "New board {}x{}, {} colors, runs of {}, seed {}",
            level.width(),
            level.height(),
            settings.palette.len(),
            settings.rules.matching_blocks_needed,
            seed
        );

        let state = BoardState {
            grid: Grid::new(level.clone()),
            legality: LegalityCache::new(),
            visuals: HashMap::new(),
            spawner: Spawner::new(settings.palette.len(), seed),
        };
        Ok(Self {
            inner: Arc::new(Inner {
                matcher: Matcher::new(settings.rules.matching_blocks_needed),
                timing: settings.timing.clone(),
                fall_through_walls: settings.rules.fall_through_walls,
                lock: InteractionLock::new(),
                presenter,
                level,
                state: Mutex::new(state),
            }),
        })
    }

    pub fn presenter(&self) -> &Arc<P> {
        &self.inner.presenter
    }

    pub fn level(&self) -> &Level {
        &self.inner.level
    }

    /// True while a fill or swap owns the board
    pub fn is_locked(&self) -> bool {
        self.inner.lock.is_locked()
    }

    pub fn occupancy(&self) -> BTreeMap<Coord, PieceColor> {
        self.inner.state().grid.occupancy()
    }

    pub fn piece_at(&self, coord: Coord) -> Option<Piece> {
        self.inner.state().grid.piece_at(coord)
    }

    /// Destructive swaps as of the last rebuild
    pub fn legal_swaps(&self) -> Vec<CellPair> {
        self.inner.state().legality.pairs()
    }

    /// What swapping `a` and `b` would destroy, as of the last rebuild
    pub fn is_legal_swap(&self, a: Coord, b: Coord) -> Option<DestroyedSet> {
        self.inner.state().legality.is_legal_swap(a, b).cloned()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let locked = self.is_locked();
        let state = self.inner.state();
        BoardSnapshot {
            width: self.inner.level.width(),
            height: self.inner.level.height(),
            locked,
            pieces: state
                .grid
                .occupancy()
                .into_iter()
                .map(|(c, color)| SnapshotPiece { x: c.x, y: c.y, color })
                .collect(),
            legal_swaps: state.legality.pairs(),
        }
    }

    /// Populate every empty floor cell, avoiding spawns that complete a run
    /// where the palette allows it. The legality cache is rebuilt before the
    /// lock is released.
    pub async fn initial_fill(&self) -> FillOutcome {
        let Some(result) = self.inner.lock.with_lock(|| self.run_fill()).await else {
            error!("{}", BoardError::LockHeldAtStart);
            return FillOutcome::Busy;
        };

        match result {
            Ok((spawned, forced_matches)) => {
                info!(
                    "Initial fill done: {} spawned, {} forced matches",
                    spawned, forced_matches
                );
                FillOutcome::Filled {
                    spawned,
                    forced_matches,
                }
            }
            Err(e) => {
                error!("Initial fill aborted: {}", e);
                FillOutcome::Aborted(e)
            }
        }
    }

    async fn run_fill(&self) -> Result<(usize, usize), BoardError> {
        let inner = &*self.inner;
        let presenter = inner.presenter.as_ref();
        let floor: Vec<Coord> = inner.level.floor_cells().collect();

        // Presets take no time; the spawn time is spread over the rest
        let per_cell = {
            let mut state = inner.state();
            let st = &mut *state;
            for &(coord, color) in inner.level.presets() {
                if st.grid.is_occupied(coord) {
                    continue;
                }
                let piece = st.grid.new_piece(color);
                st.grid.place(coord, piece)?;
                let visual = presenter.spawn_visual(color, presenter.cell_center(coord));
                st.visuals.insert(piece.id, visual);
            }
            debug!("Placed {} preset pieces", st.grid.len());
            let to_spawn = floor.iter().filter(|&&c| !st.grid.is_occupied(c)).count();
            inner.timing.total_spawn_time() / to_spawn.max(1) as u32
        };

        let mut spawned = 0;
        let mut forced = 0;
        for coord in floor {
            let placed = {
                let mut state = inner.state();
                let st = &mut *state;
                if st.grid.is_occupied(coord) {
                    false
                } else {
                    let grid = &st.grid;
                    let choice = st.spawner.choose_avoiding(|color| {
                        !inner.matcher.destroyed_by_spawn(grid, coord, color).is_empty()
                    });
                    if choice.forced {
                        warn!(
                            "Every color completes a run at {}, spawning {} anyway",
                            coord, choice.color
                        );
                        forced += 1;
                    }
                    let piece = st.grid.new_piece(choice.color);
                    st.grid.place(coord, piece)?;
                    let visual = presenter.spawn_visual(choice.color, presenter.cell_center(coord));
                    st.visuals.insert(piece.id, visual);
                    true
                }
            };
            if placed {
                spawned += 1;
                tokio::time::sleep(per_cell).await;
            }
        }

        tokio::time::sleep(inner.timing.delay_after_fill()).await;
        self.refresh_legality()?;
        Ok((spawned, forced))
    }

    /// Swap the pieces at `from` and `to`. A swap that destroys nothing is
    /// animated back; one that does is committed and cascaded.
    pub async fn swap(&self, from: Coord, to: Coord) -> SwapOutcome {
        if let Err(reason) = self.check_swap(from, to) {
            debug!("Rejected swap {} <-> {}: {}", from, to, reason);
            return SwapOutcome::Rejected(reason);
        }
        let Some(result) = self.inner.lock.with_lock(|| self.run_swap(from, to)).await else {
            warn!("Board is busy, dropping swap {} <-> {}", from, to);
            return SwapOutcome::Busy;
        };

        match result {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Swap {} <-> {} aborted: {}", from, to, e);
                SwapOutcome::Aborted(e)
            }
        }
    }

    fn check_swap(&self, from: Coord, to: Coord) -> Result<(), RejectReason> {
        if from == to {
            return Err(RejectReason::SameCell);
        }
        if !from.is_adjacent(to) {
            return Err(RejectReason::NotAdjacent);
        }
        let state = self.inner.state();
        for coord in [from, to] {
            if !state.grid.is_floor(coord) {
                return Err(RejectReason::NotFloor(coord));
            }
            if !state.grid.is_occupied(coord) {
                return Err(RejectReason::Empty(coord));
            }
        }
        Ok(())
    }

    async fn run_swap(&self, from: Coord, to: Coord) -> Result<SwapOutcome, BoardError> {
        // The board may have changed between the request and the lock
        if let Err(reason) = self.check_swap(from, to) {
            debug!("Swap {} <-> {} no longer valid: {}", from, to, reason);
            return Ok(SwapOutcome::Rejected(reason));
        }
        let inner = &*self.inner;

        let (visual_from, visual_to, cached) = {
            let state = inner.state();
            let visual = |coord: Coord| -> Result<P::Visual, BoardError> {
                let piece = state.grid.piece_at(coord).ok_or(GridError::Empty(coord))?;
                state
                    .visuals
                    .get(&piece.id)
                    .cloned()
                    .ok_or(BoardError::MissingVisual(piece.id))
            };
            let cached = state.legality.is_legal_swap(from, to).cloned();
            (visual(from)?, visual(to)?, cached.unwrap_or_default())
        };

        self.exchange(&visual_from, to, &visual_to, from).await;

        let destroyed = {
            let state = inner.state();
            inner.matcher.destroyed_by_swap(&state.grid, from, to)
        };
        if destroyed != cached {
            warn!(
                "Legality cache disagrees for {} <-> {}: cached {} cells, found {}",
                from,
                to,
                cached.len(),
                destroyed.len()
            );
        }

        if destroyed.is_empty() {
            debug!("Swap {} <-> {} destroys nothing, reverting", from, to);
            self.exchange(&visual_from, from, &visual_to, to).await;
            return Ok(SwapOutcome::Reverted);
        }

        inner.state().grid.swap(from, to)?;
        info!("Swap {} <-> {} destroys {} pieces", from, to, destroyed.len());
        let report = cascade::resolve(inner, &destroyed).await?;
        debug!(
            "Cascade done: {} spawned, {} fell, {} stranded",
            report.spawned, report.fell, report.stranded
        );
        self.refresh_legality()?;
        debug!("Board after swap: {}", self.snapshot().to_json());

        Ok(SwapOutcome::Resolved {
            destroyed,
            cascade: report,
        })
    }

    /// Move two visuals to each other's cells at once
    async fn exchange(&self, a: &P::Visual, a_to: Coord, b: &P::Visual, b_to: Coord) {
        let presenter = &self.inner.presenter;
        let duration = self.inner.timing.switch_time();
        tokio::join!(
            presenter.move_visual(a, presenter.cell_center(a_to), Easing::Linear, duration),
            presenter.move_visual(b, presenter.cell_center(b_to), Easing::Linear, duration),
        );
    }

    /// Rebuild the legality cache. Runs that already stand on the board are
    /// reported, not resolved.
    fn refresh_legality(&self) -> Result<(), BoardError> {
        let mut state = self.inner.state();
        let st = &mut *state;
        st.legality.rebuild(&st.grid, &self.inner.matcher)?;
        let standing = self.inner.matcher.all_matches(&st.grid);
        if !standing.is_empty() {
            info!("{} cells stand in completed runs, leaving them", standing.len());
        }
        debug!("{} destructive swaps available", st.legality.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::HeadlessPresenter;
    use crate::settings::{BlockStyle, default_palette};
    use std::collections::HashSet;
    use std::time::Duration;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn settings(layout: &str) -> Settings {
        let mut settings = Settings::with_default_palette();
        settings.level.layout = layout.to_string();
        settings.rules.seed = Some(7);
        settings.timing = TimingSettings::instant();
        settings
    }

    fn board(settings: &Settings) -> Board<HeadlessPresenter> {
        Board::new(settings, Arc::new(HeadlessPresenter::new())).unwrap()
    }

    async fn filled(settings: &Settings) -> Board<HeadlessPresenter> {
        let board = board(settings);
        assert!(matches!(board.initial_fill().await, FillOutcome::Filled { .. }));
        board
    }

    fn assert_consistent(board: &Board<HeadlessPresenter>) {
        let state = board.inner.state();
        let ids: HashSet<_> = state.grid.pieces().map(|(_, p)| p.id).collect();
        assert_eq!(ids.len(), state.grid.len());
        for (coord, piece) in state.grid.pieces() {
            assert!(state.grid.is_floor(coord));
            assert!(state.visuals.contains_key(&piece.id));
        }
        assert_eq!(state.visuals.len(), state.grid.len());
        assert_eq!(board.presenter().live_sprites(), state.grid.len());
    }

    #[test]
    fn test_new_rejects_bad_settings() {
        let mut settings = settings("#####\n.....");
        settings.palette.clear();
        let result = Board::new(&settings, Arc::new(HeadlessPresenter::new()));
        assert!(matches!(result, Err(BoardError::Config(_))));
    }

    #[tokio::test]
    async fn test_swap_resolves_and_refills() {
        let board = filled(&settings("#####\naabaa")).await;
        assert_eq!(board.presenter().live_sprites(), 5);
        assert!(board.is_legal_swap(c(3, 0), c(2, 0)).is_some());

        let (destroyed, cascade) = match board.swap(c(2, 0), c(3, 0)).await {
            SwapOutcome::Resolved { destroyed, cascade } => (destroyed, cascade),
            other => panic!("expected a resolved swap, got {other:?}"),
        };
        assert_eq!(destroyed, DestroyedSet::from([c(0, 0), c(1, 0), c(2, 0)]));
        assert_eq!(cascade.destroyed, 3);
        assert_eq!(cascade.spawned, 3);
        assert_eq!(cascade.stranded, 0);

        assert_eq!(board.occupancy().len(), 5);
        assert_eq!(board.presenter().destroyed_count(), 3);
        // Five presets, then one refill per destroyed piece
        assert_eq!(board.presenter().spawned_count(), 8);
        assert!(!board.is_locked());
        assert_consistent(&board);
    }

    #[tokio::test]
    async fn test_non_destructive_swap_reverts() {
        let board = filled(&settings("#####\nabcab")).await;
        let before = board.occupancy();
        let outcome = board.swap(c(0, 0), c(1, 0)).await;
        assert!(matches!(outcome, SwapOutcome::Reverted));
        assert_eq!(board.occupancy(), before);
        // Two moves there, two moves back
        assert_eq!(board.presenter().move_count(), 4);
        assert!(!board.is_locked());
    }

    #[tokio::test]
    async fn test_invalid_requests_are_rejected() {
        let board = filled(&settings("#####\nabcab")).await;
        let before = board.occupancy();
        assert!(matches!(
            board.swap(c(0, 0), c(0, 0)).await,
            SwapOutcome::Rejected(RejectReason::SameCell)
        ));
        assert!(matches!(
            board.swap(c(0, 0), c(2, 0)).await,
            SwapOutcome::Rejected(RejectReason::NotAdjacent)
        ));
        assert!(matches!(
            board.swap(c(0, 0), c(1, 1)).await,
            SwapOutcome::Rejected(RejectReason::NotAdjacent)
        ));
        assert!(matches!(
            board.swap(c(0, 0), c(0, 1)).await,
            SwapOutcome::Rejected(RejectReason::NotFloor(p)) if p == c(0, 1)
        ));
        assert_eq!(board.occupancy(), before);
        assert_eq!(board.presenter().move_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_cell_rejected() {
        // Not filled: every cell is empty
        let board = board(&settings("#####\n....."));
        assert!(matches!(
            board.swap(c(0, 0), c(1, 0)).await,
            SwapOutcome::Rejected(RejectReason::Empty(p)) if p == c(0, 0)
        ));
    }

    #[tokio::test]
    async fn test_swap_while_locked_is_busy() {
        let board = filled(&settings("#####\naabaa")).await;
        let before = board.occupancy();
        let guard = board.inner.lock.try_acquire().unwrap();
        assert!(matches!(board.swap(c(2, 0), c(3, 0)).await, SwapOutcome::Busy));
        assert_eq!(board.occupancy(), before);
        // Queries are still served
        assert!(!board.legal_swaps().is_empty());
        drop(guard);
        assert!(board.swap(c(2, 0), c(3, 0)).await.is_resolved());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_swap_is_dropped() {
        let mut settings = settings("#####\naabaa");
        settings.timing = TimingSettings::default();
        let board = filled(&settings).await;

        let running = board.clone();
        let handle = tokio::spawn(async move { running.swap(c(2, 0), c(3, 0)).await });
        tokio::task::yield_now().await;
        assert!(board.is_locked());
        assert!(matches!(board.swap(c(0, 0), c(1, 0)).await, SwapOutcome::Busy));

        assert!(handle.await.unwrap().is_resolved());
        assert!(!board.is_locked());
        assert_consistent(&board);
    }

    #[tokio::test(start_paused = true)]
    async fn test_swap_pacing() {
        let mut settings = settings("#####\naabaa");
        settings.timing = TimingSettings::default();
        let board = filled(&settings).await;

        let start = tokio::time::Instant::now();
        assert!(board.swap(c(2, 0), c(3, 0)).await.is_resolved());
        // switch, then the destroy delay, then a one-cell fall
        assert!(start.elapsed() >= Duration::from_millis(500 + 250 + 120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_fill_avoids_matches() {
        let mut settings = Settings::with_default_palette();
        settings.rules.seed = Some(3);
        let board = board(&settings);
        let floor = board.level().floor_cells().count();

        let start = tokio::time::Instant::now();
        let outcome = board.initial_fill().await;
        assert!(start.elapsed() >= Duration::from_millis(1990));

        let (spawned, forced_matches) = match outcome {
            FillOutcome::Filled {
                spawned,
                forced_matches,
            } => (spawned, forced_matches),
            other => panic!("expected a fill, got {other:?}"),
        };
        assert_eq!(spawned, floor);
        assert_eq!(forced_matches, 0);
        assert!(!board.is_locked());
        {
            let state = board.inner.state();
            assert!(state.grid.is_full());
            assert!(board.inner.matcher.all_matches(&state.grid).is_empty());
        }
        assert_consistent(&board);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fill_pacing_spreads_over_spawned_cells() {
        let mut settings = settings("####\naa..\nbb..");
        settings.timing = TimingSettings {
            delay_after_fill_ms: 0,
            ..TimingSettings::default()
        };
        let board = board(&settings);

        let start = tokio::time::Instant::now();
        assert!(matches!(board.initial_fill().await, FillOutcome::Filled { spawned: 4, .. }));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(990), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(1100), "{elapsed:?}");
    }

    #[tokio::test]
    async fn test_forced_spawn_still_places_piece() {
        // (0,2) completes a vertical run of color 0 or a horizontal run of
        // color 1, and the palette has nothing else
        let mut settings = settings("###\n.bb\na##\na##");
        settings.palette = default_palette().into_iter().take(2).collect();
        let board = board(&settings);

        let outcome = board.initial_fill().await;
        assert!(matches!(
            outcome,
            FillOutcome::Filled {
                spawned: 1,
                forced_matches: 1
            }
        ));
        assert!(board.piece_at(c(0, 2)).is_some());
        assert_consistent(&board);
    }

    #[tokio::test]
    async fn test_second_fill_spawns_nothing() {
        let board = filled(&settings("#####\n.....")).await;
        let before = board.occupancy();
        assert!(matches!(
            board.initial_fill().await,
            FillOutcome::Filled { spawned: 0, .. }
        ));
        assert_eq!(board.occupancy(), before);
    }

    #[tokio::test]
    async fn test_cascades_keep_board_consistent() {
        let mut settings = Settings::with_default_palette();
        settings.rules.seed = Some(11);
        settings.timing = TimingSettings::instant();
        let board = filled(&settings).await;

        for _ in 0..10 {
            let Some(pair) = board.legal_swaps().first().copied() else {
                break;
            };
            assert!(board.swap(pair.first(), pair.second()).await.is_resolved());
            assert!(board.inner.state().grid.is_full());
            assert_consistent(&board);
            // The cache matches a direct re-query after every rebuild
            let state = board.inner.state();
            for pair in state.legality.pairs() {
                let direct = board
                    .inner
                    .matcher
                    .destroyed_by_swap(&state.grid, pair.first(), pair.second());
                assert_eq!(state.legality.is_legal_swap(pair.first(), pair.second()), Some(&direct));
            }
        }
    }

    #[tokio::test]
    async fn test_cascade_refills_below_gap_row() {
        let settings = settings("#####\n.....\n~~~~~\naabaa");
        assert_eq!(settings.rules.fall_through_walls, 1);
        let board = filled(&settings).await;
        assert!(board.inner.state().grid.is_full());

        let cascade = match board.swap(c(2, 0), c(3, 0)).await {
            SwapOutcome::Resolved { cascade, .. } => cascade,
            other => panic!("expected a resolved swap, got {other:?}"),
        };
        // The top row drops through the gap, the refills take the top row
        assert_eq!(cascade.spawned, 3);
        assert_eq!(cascade.stranded, 0);
        assert_eq!(cascade.fell, 6);
        assert!(board.inner.state().grid.is_full());
        assert_consistent(&board);

        for _ in 0..5 {
            let Some(pair) = board.legal_swaps().first().copied() else {
                break;
            };
            assert!(board.swap(pair.first(), pair.second()).await.is_resolved());
            assert!(board.inner.state().grid.is_full());
            assert_consistent(&board);
        }
    }

    #[tokio::test]
    async fn test_snapshot_json() {
        let mut settings = settings("###\nab.");
        settings.palette = vec![
            BlockStyle::new("red", "R", "#ff0000"),
            BlockStyle::new("blue", "B", "#0000ff"),
        ];
        let board = board(&settings);
        let snapshot = board.snapshot();
        assert_eq!(snapshot.pieces.len(), 0);
        assert!(!snapshot.locked);

        board.initial_fill().await;
        let snapshot = board.snapshot();
        assert_eq!(snapshot.pieces.len(), 3);
        assert_eq!(snapshot.pieces[0], SnapshotPiece { x: 0, y: 0, color: PieceColor(0) });
        let json = board.snapshot().to_json();
        assert!(json.starts_with(r#"{"width":3,"height":2,"locked":false,"pieces":[{"x":0,"y":0,"color":0}"#));
    }
}
