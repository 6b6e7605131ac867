//! Colors and blend modes used when drawing the field.
//!
//! Particles are colored in HSL like a 2D canvas `hsla()` string: the hue comes
//! from the particle, saturation is always full, and lightness differs between
//! the soft glow and the solid core.
//!
//! ```ignore
//! let glow = Rgba::hsla(230.0, 1.0, 0.6, 0.5);
//! let core = Rgba::hsla(230.0, 1.0, 0.7, 0.5);
//! ```

use serde::{Deserialize, Serialize};

/// Lightness of the outer glow gradient's inner stop.
pub const GLOW_LIGHTNESS: f32 = 0.6;

/// Lightness of the solid particle core.
pub const CORE_LIGHTNESS: f32 = 0.7;

/// Straight (non-premultiplied) RGBA color, each channel 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    /// Opaque black.
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a color from 8-bit channels and a float alpha, like CSS `rgba()`.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Color from HSL plus alpha.
    ///
    /// * `hue` - degrees, wraps (so 380 is the same as 20)
    /// * `saturation` - 0.0 (gray) to 1.0 (vivid)
    /// * `lightness` - 0.0 (black) to 1.0 (white), 0.5 is the pure hue
    pub fn hsla(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
        Self::new(r, g, b, alpha)
    }

    /// Same color with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Channels as an array, for blending math.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::BLACK
    }
}

/// Blend mode for subsequent draw calls.
///
/// Controls how drawn colors combine with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Standard alpha blending (canvas `source-over`).
    #[default]
    Alpha,

    /// Additive blending (canvas `lighter`).
    ///
    /// Overlapping glows become brighter instead of covering each other,
    /// which is what makes the particles read as light sources.
    Additive,
}

/// Convert HSL to RGB. Hue in degrees, the rest 0.0-1.0.
fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> (f32, f32, f32) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.001
    }

    #[test]
    fn test_hsl_primaries() {
        let red = Rgba::hsla(0.0, 1.0, 0.5, 1.0);
        assert!(close(red.r, 1.0) && close(red.g, 0.0) && close(red.b, 0.0));

        let green = Rgba::hsla(120.0, 1.0, 0.5, 1.0);
        assert!(close(green.r, 0.0) && close(green.g, 1.0) && close(green.b, 0.0));

        let blue = Rgba::hsla(240.0, 1.0, 0.5, 1.0);
        assert!(close(blue.r, 0.0) && close(blue.g, 0.0) && close(blue.b, 1.0));
    }

    #[test]
    fn test_hue_wraps() {
        let a = Rgba::hsla(20.0, 1.0, 0.5, 1.0);
        let b = Rgba::hsla(380.0, 1.0, 0.5, 1.0);
        assert!(close(a.r, b.r) && close(a.g, b.g) && close(a.b, b.b));
    }

    #[test]
    fn test_lightness_extremes() {
        let white = Rgba::hsla(210.0, 1.0, 1.0, 1.0);
        assert!(close(white.r, 1.0) && close(white.g, 1.0) && close(white.b, 1.0));

        let black = Rgba::hsla(210.0, 1.0, 0.0, 1.0);
        assert!(close(black.r, 0.0) && close(black.g, 0.0) && close(black.b, 0.0));
    }

    #[test]
    fn test_field_hues_are_blue_purple() {
        // The default hue draw range sits between blue and violet.
        for hue in [200.0, 230.0, 260.0] {
            let c = Rgba::hsla(hue, 1.0, GLOW_LIGHTNESS, 1.0);
            assert!(c.b > c.r);
            assert!(c.b > c.g);
        }
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgba::new(0.0, 0.2, 0.4, 1.0);
        let b = Rgba::new(1.0, 0.6, 0.4, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert!(close(a.lerp(b, 0.5).a, 0.5));
    }
}
