//! Software rasterizer implementing [`DrawContext`].
//!
//! [`Pixmap`] plays the role of the browser canvas: a fixed-size RGBA image
//! the field draws into every frame. Shapes get a one pixel coverage ramp at
//! their edges so slow-moving particles do not shimmer.

use crate::draw::{DrawContext, DrawSurface};
use crate::error::{ExportError, SurfaceError};
use crate::visuals::{BlendMode, Rgba};
use glam::Vec2;
use std::ops::Range;
use std::path::Path;

/// An in-memory RGBA image with canvas-style blending.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: u32,
    height: u32,
    /// Row-major, straight alpha, each channel 0.0-1.0.
    pixels: Vec<[f32; 4]>,
    blend: BlendMode,
}

impl Pixmap {
    /// Create an opaque black pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::BLACK.to_array(); (width as usize) * (height as usize)],
            blend: BlendMode::Alpha,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate at a new size, cleared to opaque black.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self {
            blend: self.blend,
            ..Self::new(width, height)
        };
    }

    /// Overwrite every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color.to_array());
    }

    /// Color at a pixel, if it is inside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let [r, g, b, a] = self.pixels[self.index(x, y)];
        Some(Rgba::new(r, g, b, a))
    }

    /// 8-bit RGBA copy of the image, row-major.
    pub fn to_rgba8(&self) -> Vec<[u8; 4]> {
        self.pixels
            .iter()
            .map(|p| p.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
            .collect()
    }

    /// Encode the image as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let bytes: Vec<u8> = bytemuck::cast_slice(&self.to_rgba8()).to_vec();
        let image = image::RgbaImage::from_raw(self.width, self.height, bytes).ok_or(
            ExportError::Size {
                width: self.width,
                height: self.height,
            },
        )?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Pixel ranges covering `[min, max]`, clipped to the image.
    fn span(&self, min: Vec2, max: Vec2) -> Option<(Range<u32>, Range<u32>)> {
        let clip = |lo: f32, hi: f32, extent: u32| {
            let start = lo.floor().max(0.0).min(extent as f32) as u32;
            let end = hi.ceil().max(0.0).min(extent as f32) as u32;
            (start < end).then_some(start..end)
        };
        Some((clip(min.x, max.x, self.width)?, clip(min.y, max.y, self.height)?))
    }

    /// Blend `color` into one pixel at `coverage` (0.0-1.0).
    #[inline]
    fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let k = (color.a * coverage).clamp(0.0, 1.0);
        if k <= 0.0 {
            return;
        }
        let index = self.index(x, y);
        let dst = &mut self.pixels[index];
        let src = [color.r, color.g, color.b];

        match self.blend {
            BlendMode::Alpha => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = s * k + *d * (1.0 - k);
                }
                dst[3] = k + dst[3] * (1.0 - k);
            }
            BlendMode::Additive => {
                for (d, s) in dst.iter_mut().zip(src) {
                    *d = (*d + s * k).min(1.0);
                }
                dst[3] = (dst[3] + k).min(1.0);
            }
        }
    }

    /// Visit every pixel center inside `[min, max]`.
    fn for_each_pixel(&mut self, min: Vec2, max: Vec2, mut f: impl FnMut(&mut Self, u32, u32, Vec2)) {
        let Some((xs, ys)) = self.span(min, max) else {
            return;
        };
        for y in ys {
            for x in xs.clone() {
                f(self, x, y, Vec2::new(x as f32 + 0.5, y as f32 + 0.5));
            }
        }
    }
}

/// Coverage of a pixel whose center is `distance` from a shape edge at `extent`.
#[inline]
fn edge_coverage(extent: f32, distance: f32) -> f32 {
    (extent + 0.5 - distance).clamp(0.0, 1.0)
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

impl DrawContext for Pixmap {
    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend = mode;
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgba) {
        let (min, max) = (origin.min(origin + size), origin.max(origin + size));
        self.for_each_pixel(min, max, |pm, x, y, _| pm.blend_pixel(x, y, color, 1.0));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if !(radius > 0.0) {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        self.for_each_pixel(center - reach, center + reach, |pm, x, y, p| {
            let coverage = edge_coverage(radius, p.distance(center));
            pm.blend_pixel(x, y, color, coverage);
        });
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: Rgba, outer: Rgba) {
        if !(radius > 0.0) {
            return;
        }
        let reach = Vec2::splat(radius + 1.0);
        self.for_each_pixel(center - reach, center + reach, |pm, x, y, p| {
            let distance = p.distance(center);
            let coverage = edge_coverage(radius, distance);
            let color = inner.lerp(outer, (distance / radius).min(1.0));
            pm.blend_pixel(x, y, color, coverage);
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        let half = (width * 0.5).max(0.0);
        let reach = Vec2::splat(half + 1.0);
        self.for_each_pixel(from.min(to) - reach, from.max(to) + reach, |pm, x, y, p| {
            let coverage = edge_coverage(half, segment_distance(p, from, to));
            pm.blend_pixel(x, y, color, coverage);
        });
    }
}

impl DrawSurface for Pixmap {
    fn draw(&mut self, frame: &mut dyn FnMut(&mut dyn DrawContext)) -> Result<(), SurfaceError> {
        frame(self);
        Ok(())
    }
}
