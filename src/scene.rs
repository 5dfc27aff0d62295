//! Sprite scene driven by the board and drawn by the UI
//!
//! The board's tasks move sprites from the tokio runtime; the UI thread only
//! takes snapshots. Positions are in cell units, so a sprite resting on a
//! cell sits exactly on its coordinate.

use matchgrid::presenter::SpriteId;
use matchgrid::{Coord, Easing, PieceColor, Presenter, Vec2};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior};

/// Animation step, one frame at 60 fps
const ANIMATION_TICK: Duration = Duration::from_micros(1_000_000 / 60);
/// How long a destroyed sprite stays highlighted before it disappears
const DESTROY_FLASH: Duration = Duration::from_millis(90);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneSprite {
    pub color: PieceColor,
    pub position: Vec2,
    /// Being destroyed
    pub flashing: bool,
}

#[derive(Debug, Default)]
pub struct ScenePresenter {
    sprites: Mutex<HashMap<SpriteId, SceneSprite>>,
    next_id: AtomicU64,
}

impl ScenePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every live sprite, for drawing
    pub fn sprites(&self) -> Vec<SceneSprite> {
        self.sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .copied()
            .collect()
    }

    fn update(&self, id: SpriteId, f: impl FnOnce(&mut SceneSprite)) {
        if let Some(sprite) = self
            .sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
        {
            f(sprite);
        }
    }

    fn position(&self, id: SpriteId) -> Option<Vec2> {
        self.sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .map(|s| s.position)
    }
}

impl Presenter for ScenePresenter {
    type Visual = SpriteId;

    fn cell_center(&self, coord: Coord) -> Vec2 {
        Vec2::new(coord.x as f32, coord.y as f32)
    }

    fn spawn_visual(&self, color: PieceColor, at: Vec2) -> SpriteId {
        let id = SpriteId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let sprite = SceneSprite {
            color,
            position: at,
            flashing: false,
        };
        self.sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, sprite);
        id
    }

    async fn destroy_visual(&self, visual: SpriteId) {
        self.update(visual, |s| s.flashing = true);
        tokio::time::sleep(DESTROY_FLASH).await;
        self.sprites
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&visual);
    }

    async fn move_visual(&self, visual: &SpriteId, to: Vec2, easing: Easing, duration: Duration) {
        let id = *visual;
        let Some(from) = self.position(id) else {
            return;
        };
        if duration.is_zero() {
            self.update(id, |s| s.position = to);
            return;
        }

        let start = Instant::now();
        let mut ticker = tokio::time::interval(ANIMATION_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            let t = start.elapsed().as_secs_f32() / duration.as_secs_f32();
            let position = from.lerp(to, easing.evaluate(t));
            self.update(id, |s| s.position = position);
            if t >= 1.0 {
                break;
            }
        }
        // Land exactly on the target whatever the float error
        self.update(id, |s| s.position = to);
    }
}
