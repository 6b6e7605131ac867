//! The drawing contract between the field and whatever displays it.
//!
//! A [`DrawSurface`] is what the host hands to the background loop: each frame
//! the loop asks it for a [`DrawContext`] and issues canvas-style calls. A
//! surface that cannot draw right now returns a [`SurfaceError`] and the frame
//! is skipped.
//!
//! Two surfaces ship with the crate:
//! - [`Pixmap`](crate::Pixmap) rasterizes into memory
//! - [`DisplayList`] records the calls as [`DrawCommand`]s
//!
//! Shared surfaces are supported through `Rc<RefCell<S>>` (busy while borrowed
//! elsewhere) and `Weak<RefCell<S>>` (detached once the owner drops it).

use crate::error::SurfaceError;
use crate::visuals::{BlendMode, Rgba};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Immediate-mode 2D drawing calls, modeled on a canvas 2D context.
pub trait DrawContext {
    /// Blend mode used by every following call.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba);

    /// Fill a solid circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Fill a circle with a radial gradient from `inner` at the center to
    /// `outer` at `radius`.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
}

/// Something that can hand out a [`DrawContext`] for one frame.
pub trait DrawSurface {
    /// Run `frame` against this surface's drawing context.
    ///
    /// Returns an error without calling `frame` when the surface is not
    /// available.
    fn draw(&mut self, frame: &mut dyn FnMut(&mut dyn DrawContext)) -> Result<(), SurfaceError>;
}

impl<S: DrawSurface + ?Sized> DrawSurface for Box<S> {
    fn draw(&mut self, frame: &mut dyn FnMut(&mut dyn DrawContext)) -> Result<(), SurfaceError> {
        (**self).draw(frame)
    }
}

impl<S: DrawSurface> DrawSurface for Rc<RefCell<S>> {
    fn draw(&mut self, frame: &mut dyn FnMut(&mut dyn DrawContext)) -> Result<(), SurfaceError> {
        let mut surface = self.try_borrow_mut().map_err(|_| SurfaceError::Busy)?;
        surface.draw(frame)
    }
}

impl<S: DrawSurface> DrawSurface for Weak<RefCell<S>> {
    fn draw(&mut self, frame: &mut dyn FnMut(&mut dyn DrawContext)) -> Result<(), SurfaceError> {
        let mut shared = self.upgrade().ok_or(SurfaceError::Detached)?;
        shared.draw(frame)
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    SetBlendMode(BlendMode),
    FillRect {
        origin: Vec2,
        size: Vec2,
        color: Rgba,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    FillRadialGradient {
        center: Vec2,
        radius: f32,
        inner: Rgba,
        outer: Rgba,
    },
    StrokeLine {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Rgba,
    },
}

/// A surface that records every call instead of drawing it.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded command, oldest first.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Recorded solid circles as `(center, radius, color)`.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::FillCircle { center, radius, color } => Some((center, radius, color)),
            _ => None,
        })
    }

    /// Recorded line strokes as `(from, to, color)`.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::StrokeLine { from, to, color, .. } => Some((from, to, color)),
            _ => None,
        })
    }
}

impl DrawContext for DisplayList {
    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.commands.push(DrawCommand::SetBlendMode(mode));
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { origin, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        self.commands.push(DrawCommand::FillRadialGradient {
            center,
            radius,
            inner,
            outer,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.commands.push(DrawCommand::StrokeLine { from, to, width, color });
    }
}

impl DrawSurface for DisplayList {
    fn draw(&mut self, frame: &mut dyn FnMut(&mut dyn DrawContext)) -> Result<(), SurfaceError> {
        frame(self);
        Ok(())
    }
}
