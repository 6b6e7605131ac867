//! Fresh particle generation.
//!
//! One [`SpawnContext`] belongs to one field. It owns the field's PRNG, so a
//! seeded config reproduces the same population frame for frame.

use crate::config::{FieldConfig, ValueRange};
use crate::particle::Particle;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of randomness and freshly drawn particles for a field.
#[derive(Debug, Clone)]
pub struct SpawnContext {
    rng: SmallRng,
    seed: u64,
}

impl SpawnContext {
    /// Create a context from an explicit seed, or from the clock when `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });

        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this context started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random f32 in the inclusive range.
    #[inline]
    pub fn random_range(&mut self, range: ValueRange<f32>) -> f32 {
        self.rng.gen_range(range.min..=range.max)
    }

    /// Random u32 in the inclusive range.
    #[inline]
    pub fn random_frames(&mut self, range: ValueRange<u32>) -> u32 {
        self.rng.gen_range(range.min..=range.max)
    }

    /// Random point on a `width x height` surface.
    pub fn random_position(&mut self, width: f32, height: f32) -> Vec2 {
        Vec2::new(
            self.rng.gen_range(0.0..=width.max(0.0)),
            self.rng.gen_range(0.0..=height.max(0.0)),
        )
    }

    /// Draw a brand new particle somewhere on the surface.
    ///
    /// Every attribute is an independent draw from its configured range.
    pub fn spawn(&mut self, config: &FieldConfig, width: f32, height: f32) -> Particle {
        let position = self.random_position(width, height);
        let velocity = Vec2::new(
            self.random_range(config.speed),
            self.random_range(config.speed),
        );

        Particle {
            position,
            velocity,
            radius: self.random_range(config.radius),
            base_opacity: self.random_range(config.opacity),
            hue: self.random_range(config.hue),
            age: 0,
            lifespan: self.random_frames(config.lifespan),
        }
    }
}
