//! The running backdrop: a [`ParticleField`] ticked once per display refresh.
//!
//! ```ignore
//! let frames = FrameQueue::new();
//! let mut background = AmbientBackground::new(FieldConfig::default(), frames.clone())?;
//!
//! background.start(surface, 1280, 720);
//! // host: once per display refresh
//! frames.fire();
//! // host: on window resize
//! background.on_resize(1920, 1080);
//! // host: on teardown
//! background.stop();
//! ```
//!
//! The loop is either stopped or running. While running, each frame callback
//! ticks the field and requests the next frame. [`stop`](AmbientBackground::stop)
//! withdraws the outstanding request before returning, so nothing is drawn
//! after it no matter how many more refreshes the host signals.

use crate::config::FieldConfig;
use crate::draw::{DrawContext, DrawSurface};
use crate::error::ConfigError;
use crate::field::ParticleField;
use crate::schedule::{FrameHandle, FrameScheduler};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// What the frame callback draws with.
#[derive(Default)]
struct Scene {
    field: Option<ParticleField>,
    surface: Option<Box<dyn DrawSurface>>,
}

/// State shared between the owner and the scheduled callback.
///
/// Everything the owner may touch between frames is a `Cell`, so `stop` and
/// `on_resize` never contend with a frame in progress.
#[derive(Default)]
struct Shared {
    running: Cell<bool>,
    generation: Cell<u64>,
    pending: Cell<Option<FrameHandle>>,
    size: Cell<(u32, u32)>,
    frames: Cell<u64>,
    skipped: Cell<u64>,
    scene: RefCell<Scene>,
}

/// An ambient particle field bound to a drawing surface and a frame scheduler.
pub struct AmbientBackground<F: FrameScheduler> {
    config: FieldConfig,
    scheduler: F,
    shared: Rc<Shared>,
}

impl<F: FrameScheduler> AmbientBackground<F> {
    /// Create a stopped background. Fails if `config` does not validate.
    pub fn new(config: FieldConfig, scheduler: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            scheduler,
            shared: Rc::new(Shared::default()),
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Frames actually drawn since the last `start`.
    pub fn frames(&self) -> u64 {
        self.shared.frames.get()
    }

    /// Frames skipped because the surface was unavailable.
    pub fn skipped_frames(&self) -> u64 {
        self.shared.skipped.get()
    }

    /// Surface size the next frame will use.
    pub fn size(&self) -> (u32, u32) {
        self.shared.size.get()
    }

    /// Halt the loop. Safe to call when already stopped.
    ///
    /// Once this returns no further frame is drawn.
    pub fn stop(&mut self) {
        let was_running = self.shared.running.replace(false);
        if let Some(handle) = self.shared.pending.take() {
            self.scheduler.cancel(handle);
        }
        if was_running {
            tracing::debug!(frames = self.frames(), "ambient background stopped");
        }
    }

    /// Record new surface dimensions for the next frame.
    ///
    /// Particles keep their positions, velocities and ages; only the
    /// reflection bounds and the trail fill change. A zero width or height
    /// (a minimized window) is ignored, so the field keeps its last real size.
    pub fn on_resize(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::trace!(width, height, "ignoring empty surface size");
            return;
        }
        self.shared.size.set((width, height));
    }

    /// Read-only access to the field, if one has been seeded.
    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField) -> R) -> Option<R> {
        self.shared.scene.borrow().field.as_ref().map(f)
    }

    /// Take the surface back from a stopped background.
    pub fn take_surface(&mut self) -> Option<Box<dyn DrawSurface>> {
        if self.is_running() {
            return None;
        }
        self.shared.scene.borrow_mut().surface.take()
    }
}

impl<F: FrameScheduler + Clone + 'static> AmbientBackground<F> {
    /// Seed a fresh field on `surface` and begin ticking once per frame.
    ///
    /// Starting an already running background replaces the running loop: its
    /// outstanding frame is withdrawn and the field is reseeded.
    pub fn start<S: DrawSurface + 'static>(&mut self, surface: S, width: u32, height: u32) {
        if self.is_running() {
            tracing::debug!("ambient background restarted while running");
        }
        self.stop();

        {
            let mut scene = self.shared.scene.borrow_mut();
            scene.field = Some(ParticleField::seeded(self.config.clone(), width, height));
            scene.surface = Some(Box::new(surface));
        }
        self.shared.size.set((width, height));
        self.shared.frames.set(0);
        self.shared.skipped.set(0);
        self.shared.generation.set(self.shared.generation.get().wrapping_add(1));
        self.shared.running.set(true);

        arm(&self.shared, &self.scheduler);
        tracing::debug!(width, height, "ambient background started");
    }
}

impl<F: FrameScheduler> Drop for AmbientBackground<F> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Request the next frame for the loop owning `shared`.
fn arm<F: FrameScheduler + Clone + 'static>(shared: &Rc<Shared>, scheduler: &F) {
    let generation = shared.generation.get();
    let weak: Weak<Shared> = Rc::downgrade(shared);
    let next = scheduler.clone();

    let handle = scheduler.request_frame(Box::new(move || {
        let Some(shared) = weak.upgrade() else {
            return;
        };
        shared.pending.set(None);
        if !shared.running.get() || shared.generation.get() != generation {
            return;
        }
        run_frame(&shared);
        arm(&shared, &next);
    }));
    shared.pending.set(Some(handle));
}

/// Tick the field once, or skip quietly if the surface cannot draw.
fn run_frame(shared: &Shared) {
    let mut scene = shared.scene.borrow_mut();
    let Scene { field, surface } = &mut *scene;
    let (Some(field), Some(surface)) = (field.as_mut(), surface.as_mut()) else {
        return;
    };

    let (width, height) = shared.size.get();
    if field.size() != glam::Vec2::new(width as f32, height as f32) {
        field.resize(width, height);
    }

    match surface.draw(&mut |ctx: &mut dyn DrawContext| field.tick(ctx)) {
        Ok(()) => shared.frames.set(shared.frames.get() + 1),
        Err(e) => {
            shared.skipped.set(shared.skipped.get() + 1);
            tracing::trace!(error = %e, "surface unavailable, frame skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DisplayList;
    use crate::schedule::FrameQueue;

    fn background(frames: &FrameQueue) -> AmbientBackground<FrameQueue> {
        AmbientBackground::new(FieldConfig::default().with_seed(11), frames.clone()).unwrap()
    }

    #[test]
    fn test_starts_stopped() {
        let frames = FrameQueue::new();
        let bg = background(&frames);
        assert!(!bg.is_running());
        assert_eq!(frames.pending(), 0);
        assert!(bg.with_field(|f| f.particles().len()).is_none());
    }

    #[test]
    fn test_start_seeds_and_schedules() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        bg.start(DisplayList::new(), 800, 600);

        assert!(bg.is_running());
        assert_eq!(frames.pending(), 1);
        assert_eq!(bg.with_field(|f| f.particles().len()), Some(50));
    }

    #[test]
    fn test_each_fire_ticks_once() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        let surface = Rc::new(RefCell::new(DisplayList::new()));
        bg.start(surface.clone(), 800, 600);

        for _ in 0..5 {
            assert_eq!(frames.fire(), 1);
            assert_eq!(frames.pending(), 1);
        }
        assert_eq!(bg.frames(), 5);
        assert_eq!(bg.with_field(|f| f.stats().ticks), Some(5));
        assert!(!surface.borrow().is_empty());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        bg.stop();
        bg.start(DisplayList::new(), 800, 600);
        bg.stop();
        bg.stop();
        assert!(!bg.is_running());
        assert_eq!(frames.pending(), 0);
    }

    #[test]
    fn test_restart_replaces_loop() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        bg.start(DisplayList::new(), 800, 600);
        frames.fire();
        bg.start(DisplayList::new(), 400, 300);

        assert_eq!(frames.pending(), 1);
        assert_eq!(bg.frames(), 0);
        frames.fire();
        assert_eq!(bg.frames(), 1);
        assert_eq!(bg.size(), (400, 300));
    }

    #[test]
    fn test_busy_surface_skips_frame() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        let surface = Rc::new(RefCell::new(DisplayList::new()));
        bg.start(surface.clone(), 800, 600);

        let before = bg.with_field(|f| f.particles().to_vec()).unwrap();
        {
            let _held = surface.borrow();
            frames.fire();
        }
        assert_eq!(bg.skipped_frames(), 1);
        assert_eq!(bg.frames(), 0);
        assert_eq!(bg.with_field(|f| f.particles().to_vec()).unwrap(), before);

        // The loop kept itself alive and draws again once the surface frees up.
        assert_eq!(frames.pending(), 1);
        frames.fire();
        assert_eq!(bg.frames(), 1);
    }

    #[test]
    fn test_resize_applies_next_frame() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        bg.start(DisplayList::new(), 800, 600);

        bg.on_resize(300, 200);
        assert_eq!(bg.with_field(|f| f.size()), Some(glam::Vec2::new(800.0, 600.0)));
        frames.fire();
        assert_eq!(bg.with_field(|f| f.size()), Some(glam::Vec2::new(300.0, 200.0)));
    }

    #[test]
    fn test_minimize_keeps_particles_in_place() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        bg.start(DisplayList::new(), 800, 600);
        frames.fire();

        bg.on_resize(0, 0);
        bg.on_resize(800, 0);
        assert_eq!(bg.size(), (800, 600));
        frames.fire();
        bg.on_resize(800, 600);
        frames.fire();

        let at_origin = bg
            .with_field(|f| f.particles().iter().filter(|p| p.position == glam::Vec2::ZERO).count())
            .unwrap();
        assert_eq!(at_origin, 0);
        assert_eq!(bg.with_field(|f| f.size()), Some(glam::Vec2::new(800.0, 600.0)));
    }

    #[test]
    fn test_drop_withdraws_frame() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        bg.start(DisplayList::new(), 800, 600);
        drop(bg);
        assert_eq!(frames.pending(), 0);
        assert_eq!(frames.fire(), 0);
    }

    #[test]
    fn test_take_surface_only_when_stopped() {
        let frames = FrameQueue::new();
        let mut bg = background(&frames);
        bg.start(DisplayList::new(), 800, 600);
        assert!(bg.take_surface().is_none());
        bg.stop();
        assert!(bg.take_surface().is_some());
    }
}
