//! Tuning constants for the particle field.
//!
//! Every literal that shapes the look of the field lives here as a named
//! default. Configs can be built in code with the `with_*` methods or loaded
//! from JSON; fields missing from the JSON keep their defaults.
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_population(80)
//!     .with_hue(160.0, 200.0)
//!     .with_seed(7);
//! config.validate()?;
//! ```

use crate::error::ConfigError;
use crate::visuals::Rgba;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Inclusive `[min, max]` range a per-particle value is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange<T> {
    pub min: T,
    pub max: T,
}

impl<T> ValueRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> ValueRange<T> {
    /// Whether `value` falls inside the range (both ends included).
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

impl ValueRange<f32> {
    fn check(&self, name: &str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::Invalid(format!("{} must be finite", name)));
        }
        if self.min > self.max {
            return Err(ConfigError::Invalid(format!(
                "{} range is inverted ({} > {})",
                name, self.min, self.max
            )));
        }
        if !(self.max - self.min).is_finite() {
            return Err(ConfigError::Invalid(format!("{} range is too wide", name)));
        }
        Ok(())
    }
}

/// Largest population a field may be configured with.
pub const MAX_POPULATION: usize = 100_000;

fn default_population() -> usize {
    50
}

fn default_speed() -> ValueRange<f32> {
    ValueRange::new(-0.25, 0.25)
}

fn default_radius() -> ValueRange<f32> {
    ValueRange::new(1.0, 4.0)
}

fn default_opacity() -> ValueRange<f32> {
    ValueRange::new(0.2, 0.8)
}

fn default_hue() -> ValueRange<f32> {
    ValueRange::new(200.0, 260.0)
}

fn default_lifespan() -> ValueRange<u32> {
    ValueRange::new(200, 500)
}

fn default_link_distance() -> f32 {
    100.0
}

fn default_link_opacity() -> f32 {
    0.3
}

fn default_link_width() -> f32 {
    0.5
}

fn default_link_color() -> Rgba {
    Rgba::from_rgb8(147, 197, 253, 1.0)
}

fn default_glow_scale() -> f32 {
    3.0
}

fn default_trail() -> Rgba {
    Rgba::from_rgb8(10, 10, 20, 0.05)
}

/// Complete field configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Target live particle count, restored at the end of every tick.
    #[serde(default = "default_population")]
    pub population: usize,
    /// Per-axis velocity draw, display units per frame.
    #[serde(default = "default_speed")]
    pub speed: ValueRange<f32>,
    /// Core radius draw.
    #[serde(default = "default_radius")]
    pub radius: ValueRange<f32>,
    /// Opacity at birth.
    #[serde(default = "default_opacity")]
    pub opacity: ValueRange<f32>,
    /// Hue draw in degrees.
    #[serde(default = "default_hue")]
    pub hue: ValueRange<f32>,
    /// Lifespan draw in frames.
    #[serde(default = "default_lifespan")]
    pub lifespan: ValueRange<u32>,
    /// Pairs closer than this are linked.
    #[serde(default = "default_link_distance")]
    pub link_distance: f32,
    /// Link opacity for two particles at the same spot.
    #[serde(default = "default_link_opacity")]
    pub link_opacity: f32,
    #[serde(default = "default_link_width")]
    pub link_width: f32,
    /// Link color; its alpha is replaced by the distance falloff.
    #[serde(default = "default_link_color")]
    pub link_color: Rgba,
    /// Glow radius as a multiple of the core radius.
    #[serde(default = "default_glow_scale")]
    pub glow_scale: f32,
    /// Color painted over the whole surface each frame instead of a clear.
    #[serde(default = "default_trail")]
    pub trail: Rgba,
    /// PRNG seed. `None` seeds from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            population: default_population(),
            speed: default_speed(),
            radius: default_radius(),
            opacity: default_opacity(),
            hue: default_hue(),
            lifespan: default_lifespan(),
            link_distance: default_link_distance(),
            link_opacity: default_link_opacity(),
            link_width: default_link_width(),
            link_color: default_link_color(),
            glow_scale: default_glow_scale(),
            trail: default_trail(),
            seed: None,
        }
    }
}

impl FieldConfig {
    /// Set the target population.
    pub fn with_population(mut self, population: usize) -> Self {
        self.population = population;
        self
    }

    /// Set the per-axis velocity range.
    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed = ValueRange::new(min, max);
        self
    }

    /// Set the core radius range.
    pub fn with_radius(mut self, min: f32, max: f32) -> Self {
        self.radius = ValueRange::new(min, max);
        self
    }

    /// Set the birth opacity range.
    pub fn with_opacity(mut self, min: f32, max: f32) -> Self {
        self.opacity = ValueRange::new(min, max);
        self
    }

    /// Set the hue range in degrees.
    pub fn with_hue(mut self, min: f32, max: f32) -> Self {
        self.hue = ValueRange::new(min, max);
        self
    }

    /// Set the lifespan range in frames.
    pub fn with_lifespan(mut self, min: u32, max: u32) -> Self {
        self.lifespan = ValueRange::new(min, max);
        self
    }

    /// Set the linking distance and the link opacity at zero distance.
    pub fn with_links(mut self, distance: f32, opacity: f32) -> Self {
        self.link_distance = distance;
        self.link_opacity = opacity;
        self
    }

    /// Set the trail fill color.
    pub fn with_trail(mut self, trail: Rgba) -> Self {
        self.trail = trail;
        self
    }

    /// Fix the PRNG seed for reproducible fields.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check that every value is usable by the simulator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::Invalid("population must be at least 1".into()));
        }
        if self.population > MAX_POPULATION {
            return Err(ConfigError::Invalid(format!(
                "population must be at most {}",
                MAX_POPULATION
            )));
        }

        self.speed.check("speed")?;
        self.radius.check("radius")?;
        self.opacity.check("opacity")?;
        self.hue.check("hue")?;

        if self.radius.min < 0.0 {
            return Err(ConfigError::Invalid("radius must not be negative".into()));
        }
        if self.opacity.min < 0.0 || self.opacity.max > 1.0 {
            return Err(ConfigError::Invalid("opacity must lie within 0..=1".into()));
        }

        if self.lifespan.min == 0 {
            return Err(ConfigError::Invalid("lifespan must be at least 1 frame".into()));
        }
        if self.lifespan.min > self.lifespan.max {
            return Err(ConfigError::Invalid(format!(
                "lifespan range is inverted ({} > {})",
                self.lifespan.min, self.lifespan.max
            )));
        }

        if !self.link_distance.is_finite() || self.link_distance <= 0.0 {
            return Err(ConfigError::Invalid("link_distance must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.link_opacity) {
            return Err(ConfigError::Invalid("link_opacity must lie within 0..=1".into()));
        }
        if !self.link_width.is_finite() || self.link_width < 0.0 {
            return Err(ConfigError::Invalid("link_width must not be negative".into()));
        }
        if !self.glow_scale.is_finite() || self.glow_scale < 0.0 {
            return Err(ConfigError::Invalid("glow_scale must not be negative".into()));
        }

        Ok(())
    }

    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load and validate a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
