//! Frame timing for hosts.
//!
//! The field itself advances one step per frame and never reads a clock.
//! [`FrameClock`] is for the host: it counts presented frames and keeps a
//! periodically refreshed FPS figure for logging and window titles.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // once per presented frame:
//! if clock.tick() {
//!     tracing::debug!(fps = clock.fps(), "frame rate");
//! }
//! ```

use std::time::{Duration, Instant};

/// Counts frames and measures frames per second.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last frame was counted.
    last_frame: Instant,
    /// Time between the last two frames.
    delta: Duration,
    /// Total frames since start.
    frame_count: u64,
    /// Frames per second over the last measuring window.
    fps: f32,
    /// Frame count when the current window opened.
    window_frames: u64,
    /// When the current window opened.
    window_start: Instant,
    /// Length of a measuring window.
    interval: Duration,
}

impl FrameClock {
    /// Create a clock measuring FPS over half-second windows.
    pub fn new() -> Self {
        Self::with_interval(Duration::from_millis(500))
    }

    /// Create a clock with a custom FPS measuring window.
    pub fn with_interval(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            window_frames: 0,
            window_start: now,
            interval,
        }
    }

    /// Count one frame. Returns `true` when the FPS figure was refreshed.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> bool {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;

        let window = now.saturating_duration_since(self.window_start);
        if window < self.interval || window.is_zero() {
            return false;
        }
        let frames = self.frame_count - self.window_frames;
        self.fps = frames as f32 / window.as_secs_f32();
        self.window_frames = self.frame_count;
        self.window_start = now;
        true
    }

    /// Total frames counted.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second over the last completed window.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Time between the last two frames.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.fps(), 0.0);
        assert_eq!(clock.delta(), Duration::ZERO);
    }

    #[test]
    fn test_fps_window() {
        let mut clock = FrameClock::with_interval(Duration::from_millis(500));
        let t0 = clock.window_start;

        // 30 frames across one second, one every 1/30 s.
        let step = Duration::from_secs(1) / 30;
        let mut refreshed = 0;
        for i in 1..=30 {
            if clock.tick_at(t0 + step * i) {
                refreshed += 1;
            }
        }

        assert_eq!(clock.frame(), 30);
        // 15 steps fall a few nanoseconds short of 500ms, so the window closes on frame 16.
        assert_eq!(refreshed, 1);
        assert!((clock.fps() - 30.0).abs() < 1.0);
        assert_eq!(clock.delta(), step);
    }
}
