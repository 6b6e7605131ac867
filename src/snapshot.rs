//! Headless host: run the background for a fixed number of frames into a
//! [`Pixmap`] and write the result as a PNG.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::background::AmbientBackground;
use crate::config::FieldConfig;
use crate::error::{ConfigError, HostError};
use crate::raster::Pixmap;
use crate::schedule::FrameQueue;

/// Render `frames` frames of a `width x height` field.
pub fn render(
    config: &FieldConfig,
    width: u32,
    height: u32,
    frames: u32,
) -> Result<Pixmap, ConfigError> {
    let queue = FrameQueue::new();
    let pixmap = Rc::new(RefCell::new(Pixmap::new(width, height)));

    let mut background = AmbientBackground::new(config.clone(), queue.clone())?;
    background.start(pixmap.clone(), width, height);
    for _ in 0..frames {
        queue.fire();
    }
    background.stop();
    drop(background);

    Ok(Rc::try_unwrap(pixmap)
        .map(RefCell::into_inner)
        .unwrap_or_else(|shared| shared.borrow().clone()))
}

/// Render and write a PNG to `path`.
pub fn write(
    config: &FieldConfig,
    width: u32,
    height: u32,
    frames: u32,
    path: impl AsRef<Path>,
) -> Result<(), HostError> {
    let path = path.as_ref();
    let pixmap = render(config, width, height, frames)?;
    pixmap.save_png(path)?;
    tracing::info!(path = %path.display(), width, height, frames, "snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit_pixels(pixmap: &Pixmap) -> usize {
        pixmap
            .to_rgba8()
            .iter()
            .filter(|[r, g, b, _]| *r > 40 || *g > 40 || *b > 40)
            .count()
    }

    #[test]
    fn test_render_draws_particles() {
        let config = FieldConfig::default().with_seed(5);
        let pixmap = render(&config, 160, 120, 10).unwrap();

        assert_eq!((pixmap.width(), pixmap.height()), (160, 120));
        assert!(lit_pixels(&pixmap) > 0);
    }

    #[test]
    fn test_zero_frames_is_blank() {
        let config = FieldConfig::default().with_seed(5);
        let pixmap = render(&config, 32, 32, 0).unwrap();
        assert_eq!(lit_pixels(&pixmap), 0);
    }

    #[test]
    fn test_same_seed_same_image() {
        let config = FieldConfig::default().with_seed(99);
        let a = render(&config, 64, 48, 20).unwrap();
        let b = render(&config, 64, 48, 20).unwrap();
        assert_eq!(a.to_rgba8(), b.to_rgba8());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FieldConfig::default().with_population(0);
        assert!(render(&config, 32, 32, 1).is_err());
    }

    #[test]
    fn test_write_png() {
        let path = std::env::temp_dir().join(format!("glowfield-snapshot-{}.png", std::process::id()));
        let config = FieldConfig::default().with_seed(1);
        write(&config, 48, 32, 3, &path).unwrap();

        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (48, 32));
        std::fs::remove_file(&path).ok();
    }
}
