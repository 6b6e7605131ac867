//! # Glowfield - Ambient Particle Backdrop
//!
//! A small population of glowing particles that drift, bounce off the edges,
//! fade out as they age and are replaced, with faint lines linking every pair
//! that drifts close together. A translucent trail fill each frame leaves
//! short motion streaks instead of a hard clear.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glowfield::prelude::*;
//!
//! let frames = FrameQueue::new();
//! let pixmap = Rc::new(RefCell::new(Pixmap::new(800, 600)));
//!
//! let mut background = AmbientBackground::new(FieldConfig::default(), frames.clone())?;
//! background.start(pixmap.clone(), 800, 600);
//!
//! // once per display refresh
//! frames.fire();
//! ```
//!
//! ## Core Concepts
//!
//! ### Field
//!
//! [`ParticleField`] owns the particles and runs one update-and-draw cycle
//! per [`tick`](ParticleField::tick):
//!
//! 1. Trail fill over the whole surface (alpha blend).
//! 2. Each particle moves, reflects off the bounds, ages and is drawn as a
//!    soft glow plus a solid core (additive blend).
//! 3. Expired particles are replaced so the population stays constant.
//! 4. Pairs within the link distance are joined by a line whose opacity
//!    falls off linearly with distance (alpha blend).
//!
//! ### Surfaces
//!
//! The field draws through [`DrawContext`], a 2D immediate-mode canvas with
//! rectangles, circles, radial gradients, lines and two blend modes.
//! [`DrawSurface`] is something that can hand out a context for one frame,
//! or refuse; a refused frame is skipped and the loop carries on.
//!
//! | Surface | Use |
//! |---------|-----|
//! | [`Pixmap`] | Software raster, shown in a window or saved as PNG |
//! | [`DisplayList`] | Records commands, for tests and inspection |
//! | `Rc<RefCell<S>>` | Shared surface; busy while borrowed elsewhere |
//! | `Weak<RefCell<S>>` | Detached once the owner drops it |
//!
//! ### Scheduling
//!
//! [`AmbientBackground`] ties a field to a surface and a [`FrameScheduler`],
//! a "run this on the next display refresh" primitive with cancellation.
//! [`FrameQueue`] is the scheduler used by both bundled hosts.

pub mod background;
pub mod config;
pub mod draw;
pub mod error;
pub mod field;
mod gpu;
pub mod links;
pub mod particle;
pub mod raster;
pub mod schedule;
pub mod snapshot;
pub mod spawn;
pub mod time;
pub mod visuals;
pub mod window;

pub use background::AmbientBackground;
pub use config::{FieldConfig, ValueRange};
pub use draw::{DisplayList, DrawCommand, DrawContext, DrawSurface};
pub use error::{ConfigError, ExportError, GpuError, HostError, SurfaceError};
pub use field::{FieldStats, ParticleField};
pub use glam::Vec2;
pub use links::Link;
pub use particle::Particle;
pub use raster::Pixmap;
pub use schedule::{FrameCallback, FrameHandle, FrameQueue, FrameScheduler};
pub use spawn::SpawnContext;
pub use time::FrameClock;
pub use visuals::{BlendMode, Rgba};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glowfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::background::AmbientBackground;
    pub use crate::config::{FieldConfig, ValueRange};
    pub use crate::draw::{DisplayList, DrawContext, DrawSurface};
    pub use crate::field::ParticleField;
    pub use crate::raster::Pixmap;
    pub use crate::schedule::{FrameQueue, FrameScheduler};
    pub use crate::visuals::{BlendMode, Rgba};
    pub use crate::Vec2;
    pub use std::cell::RefCell;
    pub use std::rc::Rc;
}
