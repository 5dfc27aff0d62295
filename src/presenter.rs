//! Presentation interface consumed by the board
//!
//! The board never draws anything. It asks a [`Presenter`] for cell
//! centers, piece visuals and movement, and awaits the movement futures
//! to sequence its steps.

use crate::coord::Coord;
use crate::piece::PieceColor;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// A position in presentation space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn lerp(self, to: Vec2, t: f32) -> Vec2 {
        Vec2::new(self.x + (to.x - self.x) * t, self.y + (to.y - self.y) * t)
    }
}

/// Motion curve applied to movement progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map progress `t` in [0, 1] to eased progress. Input is clamped.
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Everything the board needs from the presentation layer
pub trait Presenter: Send + Sync + 'static {
    /// Handle to a presented piece
    type Visual: Clone + Send + Sync + fmt::Debug + 'static;

    /// World position of a cell's center, used as animation target
    fn cell_center(&self, coord: Coord) -> Vec2;

    /// Create a visual for a new piece
    fn spawn_visual(&self, color: PieceColor, at: Vec2) -> Self::Visual;

    /// Release a visual. Completes once it is gone.
    fn destroy_visual(&self, visual: Self::Visual) -> impl Future<Output = ()> + Send;

    /// Move a visual to `to` along `easing` over `duration`. Completes once
    /// the visual has arrived.
    fn move_visual(
        &self,
        visual: &Self::Visual,
        to: Vec2,
        easing: Easing,
        duration: Duration,
    ) -> impl Future<Output = ()> + Send;
}

/// Identifier of a sprite owned by [`HeadlessPresenter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub color: PieceColor,
    pub position: Vec2,
}

/// Presenter without output. Movement takes its full duration (on the tokio
/// clock) and then snaps to the target, which keeps pacing observable.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    sprites: Mutex<HashMap<SpriteId, Sprite>>,
    next_id: AtomicU64,
    destroyed: AtomicU64,
    moves: AtomicU64,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprites currently alive
    pub fn live_sprites(&self) -> usize {
        self.sprites.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<Sprite> {
        self.sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .copied()
    }

    pub fn spawned_count(&self) -> u64 {
        self.next_id.load(Ordering::Relaxed)
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed.load(Ordering::Relaxed)
    }

    pub fn move_count(&self) -> u64 {
        self.moves.load(Ordering::Relaxed)
    }
}

impl Presenter for HeadlessPresenter {
    type Visual = SpriteId;

    fn cell_center(&self, coord: Coord) -> Vec2 {
        Vec2::new(coord.x as f32 + 0.5, coord.y as f32 + 0.5)
    }

    fn spawn_visual(&self, color: PieceColor, at: Vec2) -> SpriteId {
        let id = SpriteId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, Sprite { color, position: at });
        id
    }

    async fn destroy_visual(&self, visual: SpriteId) {
        let removed = self
            .sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&visual);
        if removed.is_some() {
            self.destroyed.fetch_add(1, Ordering::Relaxed);
        }
        tokio::task::yield_now().await;
    }

    async fn move_visual(&self, visual: &SpriteId, to: Vec2, _easing: Easing, duration: Duration) {
        self.moves.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(duration).await;
        if let Some(sprite) = self
            .sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(visual)
        {
            sprite.position = to;
        }
    }
}
