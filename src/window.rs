//! Windowed host: a winit window whose redraws drive the background loop.
//!
//! Each `RedrawRequested` is one display refresh. The host fires the frame
//! queue (which ticks the field into the pixmap), uploads the pixmap and
//! presents it, then asks for the next redraw.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::background::AmbientBackground;
use crate::config::FieldConfig;
use crate::error::HostError;
use crate::gpu::Presenter;
use crate::raster::Pixmap;
use crate::schedule::FrameQueue;
use crate::time::FrameClock;

const TITLE: &str = "glowfield";

/// Open a window and run the backdrop until it is closed.
pub fn run(config: FieldConfig) -> Result<(), HostError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    pixmap: Rc<RefCell<Pixmap>>,
    frames: FrameQueue,
    background: AmbientBackground<FrameQueue>,
    clock: FrameClock,
    error: Option<HostError>,
}

impl App {
    fn new(config: FieldConfig) -> Result<Self, HostError> {
        let frames = FrameQueue::new();
        let background = AmbientBackground::new(config, frames.clone())?;
        Ok(Self {
            window: None,
            presenter: None,
            pixmap: Rc::new(RefCell::new(Pixmap::new(0, 0))),
            frames,
            background,
            clock: FrameClock::new(),
            error: None,
        })
    }

    /// Bring up the window, the presenter and the background loop.
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<(), HostError> {
        let window_attrs = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        let (width, height) = field_size(&window, window.inner_size());
        self.pixmap.borrow_mut().resize(width, height);
        self.background
            .start(Rc::downgrade(&self.pixmap), width, height);

        window.request_redraw();
        self.window = Some(window);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        self.background.stop();
        event_loop.exit();
    }

    fn resized(&mut self, size: PhysicalSize<u32>) {
        let Some(window) = &self.window else {
            return;
        };
        let (width, height) = field_size(window, size);
        // Minimized: keep the last real size until the window comes back.
        if width == 0 || height == 0 {
            return;
        }
        if let Some(presenter) = &mut self.presenter {
            presenter.resize(size);
        }
        self.pixmap.borrow_mut().resize(width, height);
        self.background.on_resize(width, height);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.frames.fire();

        let mut out_of_memory = false;
        if let Some(presenter) = &mut self.presenter {
            presenter.upload(&self.pixmap.borrow());
            match presenter.render() {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    presenter.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => out_of_memory = true,
                Err(e) => tracing::warn!(error = ?e, "render error"),
            }
        }
        if out_of_memory {
            tracing::error!("surface out of memory");
            self.close(event_loop);
            return;
        }

        if self.clock.tick() {
            tracing::debug!(
                fps = self.clock.fps(),
                frame_ms = self.clock.delta().as_secs_f32() * 1000.0,
                frames = self.background.frames(),
                skipped = self.background.skipped_frames(),
                "frame rate"
            );
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.close(event_loop),
            WindowEvent::Resized(physical_size) => self.resized(physical_size),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// The field works in logical pixels; the presenter scales to the window.
fn field_size(window: &Window, size: PhysicalSize<u32>) -> (u32, u32) {
    let logical: LogicalSize<u32> = size.to_logical(window.scale_factor());
    (logical.width, logical.height)
}
