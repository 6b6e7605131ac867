//! A single glowing point in the field and its per-frame update rule.

use glam::Vec2;

/// One particle of the ambient field.
///
/// Everything except `position`, `velocity` and `age` is drawn once at birth
/// and never changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in display units, inside `[0, width] x [0, height]`.
    pub position: Vec2,
    /// Displacement per frame.
    pub velocity: Vec2,
    /// Radius of the solid core.
    pub radius: f32,
    /// Opacity at birth; fades linearly to zero over the lifespan.
    pub base_opacity: f32,
    /// Hue in degrees.
    pub hue: f32,
    /// Frames survived so far.
    pub age: u32,
    /// Frames this particle lives.
    pub lifespan: u32,
}

impl Particle {
    /// Fraction of the lifespan used up, 0.0 at birth and 1.0 at death.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.lifespan == 0 {
            return 1.0;
        }
        self.age as f32 / self.lifespan as f32
    }

    /// Opacity to draw with at the current age.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.base_opacity * (1.0 - self.life_ratio()).max(0.0)
    }

    /// Whether the particle has used up its lifespan.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.age >= self.lifespan
    }

    /// Advance one frame inside a `width x height` surface.
    ///
    /// Euler step, then per-axis reflection: a particle at or past an edge has
    /// that velocity component pointed back inward and its position clamped
    /// onto the surface. Finally the particle ages by one frame.
    pub fn advance(&mut self, width: f32, height: f32) {
        self.position += self.velocity;

        let (x, vx) = reflect(self.position.x, self.velocity.x, width);
        let (y, vy) = reflect(self.position.y, self.velocity.y, height);
        self.position = Vec2::new(x, y);
        self.velocity = Vec2::new(vx, vy);

        self.age = self.age.saturating_add(1).min(self.lifespan);
    }
}

/// Reflect one axis against `[0, extent]`.
fn reflect(pos: f32, vel: f32, extent: f32) -> (f32, f32) {
    let extent = extent.max(0.0);
    if pos <= 0.0 {
        (0.0, vel.abs())
    } else if pos >= extent {
        (extent, -vel.abs())
    } else {
        (pos, vel)
    }
}
