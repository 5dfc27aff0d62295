//! Random piece colors for spawning
//!
//! Colors come from a seeded ChaCha generator so a board started with the
//! same seed and level fills the same way.

use crate::piece::PieceColor;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of picking a color under the self-match veto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnChoice {
    pub color: PieceColor,
    /// Every palette color would have matched; `color` matches anyway
    pub forced: bool,
}

#[derive(Debug, Clone)]
pub struct Spawner {
    rng: ChaCha8Rng,
    palette_len: usize,
}

impl Spawner {
    /// `palette_len` must be between 1 and 256, which settings validation
    /// guarantees
    pub fn new(palette_len: usize, seed: u64) -> Self {
        debug_assert!((1..=256).contains(&palette_len));
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            palette_len,
        }
    }

    /// A uniformly random palette color
    pub fn random_color(&mut self) -> PieceColor {
        PieceColor(self.rng.gen_range(0..self.palette_len) as u8)
    }

    /// Try a random color, then the following palette colors in order
    /// (wrapping) until one passes `would_match`. If none does, the random
    /// color is returned and marked as forced.
    pub fn choose_avoiding(&mut self, mut would_match: impl FnMut(PieceColor) -> bool) -> SpawnChoice {
        let first = self.random_color();
        let found = (0..self.palette_len)
            .map(|offset| PieceColor(((first.index() + offset) % self.palette_len) as u8))
            .find(|&color| !would_match(color));
        match found {
            Some(color) => SpawnChoice { color, forced: false },
            None => SpawnChoice {
                color: first,
                forced: true,
            },
        }
    }
}
