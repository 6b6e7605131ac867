//! Integration tests for the ambient field's observable behavior.
//!
//! These drive the public API only: a field ticked by hand, or a background
//! driven through a `FrameQueue` the way the bundled hosts drive it.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use glowfield::links::{link_opacity, links};
use glowfield::{AmbientBackground, DisplayList, FieldConfig, FrameQueue, Particle, ParticleField};

fn field(seed: u64) -> ParticleField {
    ParticleField::new(FieldConfig::default().with_seed(seed), 800, 600).unwrap()
}

fn particle_at(position: Vec2, velocity: Vec2, lifespan: u32) -> Particle {
    Particle {
        position,
        velocity,
        radius: 2.0,
        base_opacity: 0.8,
        hue: 220.0,
        age: 0,
        lifespan,
    }
}

// ============================================================================
// Population, lifetime and bounds over a long run
// ============================================================================

#[test]
fn test_long_run_scenario() {
    let mut field = field(2024);
    let mut list = DisplayList::new();

    for tick in 0..500 {
        list.clear();
        field.tick(&mut list);

        assert_eq!(field.particles().len(), 50, "population drifted on tick {tick}");
        for p in field.particles() {
            assert!(
                (0.0..=800.0).contains(&p.position.x) && (0.0..=600.0).contains(&p.position.y),
                "particle escaped on tick {tick}: {:?}",
                p.position
            );
        }
    }

    // Every seeded lifespan is at most 500 frames.
    assert!(field.stats().replaced > 0);
    assert_eq!(field.stats().ticks, 500);
}

#[test]
fn test_age_never_exceeds_lifespan() {
    let config = FieldConfig::default().with_lifespan(5, 20).with_seed(3);
    let mut field = ParticleField::new(config, 800, 600).unwrap();

    for _ in 0..200 {
        field.tick(&mut DisplayList::new());
        // A particle that reached its lifespan was replaced within the same tick.
        assert!(field.particles().iter().all(|p| p.age < p.lifespan));
    }
}

#[test]
fn test_fast_particles_stay_contained() {
    let config = FieldConfig::default().with_speed(-40.0, 40.0).with_seed(8);
    let mut field = ParticleField::new(config, 100, 80).unwrap();

    for _ in 0..300 {
        field.tick(&mut DisplayList::new());
        for p in field.particles() {
            assert!((0.0..=100.0).contains(&p.position.x));
            assert!((0.0..=80.0).contains(&p.position.y));
        }
    }
}

// ============================================================================
// Single particle rules
// ============================================================================

#[test]
fn test_reflection_at_right_edge() {
    let mut p = particle_at(Vec2::new(799.9, 300.0), Vec2::new(0.25, 0.0), 100);
    p.advance(800.0, 600.0);

    assert_eq!(p.velocity.x, -0.25);
    assert!(p.position.x <= 800.0);
}

#[test]
fn test_reflection_at_left_edge() {
    let mut p = particle_at(Vec2::new(0.1, 300.0), Vec2::new(-0.25, 0.0), 100);
    p.advance(800.0, 600.0);

    assert_eq!(p.velocity.x, 0.25);
    assert!(p.position.x >= 0.0);
}

#[test]
fn test_opacity_decays_to_zero() {
    let mut p = particle_at(Vec2::new(400.0, 300.0), Vec2::ZERO, 10);
    let mut last = p.opacity();
    assert_eq!(last, 0.8);

    while p.age < p.lifespan {
        p.advance(800.0, 600.0);
        let now = p.opacity();
        assert!(now <= last);
        last = now;
    }
    assert_eq!(p.opacity(), 0.0);
}

// ============================================================================
// Links
// ============================================================================

#[test]
fn test_link_threshold() {
    assert_eq!(link_opacity(100.0, 100.0, 0.3), Some(0.0));
    assert!((link_opacity(50.0, 100.0, 0.3).unwrap() - 0.15).abs() < 1e-6);
    assert_eq!(link_opacity(0.0, 100.0, 0.3), Some(0.3));
    assert_eq!(link_opacity(100.5, 100.0, 0.3), None);
}

#[test]
fn test_links_between_particles() {
    let particles = [
        particle_at(Vec2::new(0.0, 0.0), Vec2::ZERO, 10),
        particle_at(Vec2::new(50.0, 0.0), Vec2::ZERO, 10),
        particle_at(Vec2::new(300.0, 0.0), Vec2::ZERO, 10),
    ];

    let found = links(&particles, 100.0, 0.3);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].from, Vec2::new(0.0, 0.0));
    assert_eq!(found[0].to, Vec2::new(50.0, 0.0));
    assert!((found[0].opacity - 0.15).abs() < 1e-6);
}

// ============================================================================
// Background loop
// ============================================================================

#[test]
fn test_stop_halts_drawing() {
    let frames = FrameQueue::new();
    let surface = Rc::new(RefCell::new(DisplayList::new()));
    let mut background =
        AmbientBackground::new(FieldConfig::default().with_seed(1), frames.clone()).unwrap();

    background.start(surface.clone(), 800, 600);
    for _ in 0..3 {
        frames.fire();
    }
    assert_eq!(background.frames(), 3);

    background.stop();
    let drawn = surface.borrow().len();
    for _ in 0..100 {
        frames.fire();
    }

    assert_eq!(surface.borrow().len(), drawn);
    assert_eq!(background.frames(), 3);
    assert!(!background.is_running());
}

#[test]
fn test_detached_surface_skips_silently() {
    let frames = FrameQueue::new();
    let surface = Rc::new(RefCell::new(DisplayList::new()));
    let mut background =
        AmbientBackground::new(FieldConfig::default().with_seed(1), frames.clone()).unwrap();

    background.start(Rc::downgrade(&surface), 800, 600);
    frames.fire();
    assert_eq!(background.frames(), 1);

    drop(surface);
    frames.fire();
    frames.fire();
    assert_eq!(background.frames(), 1);
    assert_eq!(background.skipped_frames(), 2);
    assert!(background.is_running());
}

#[test]
fn test_resize_is_non_destructive() {
    let frames = FrameQueue::new();
    let mut background =
        AmbientBackground::new(FieldConfig::default().with_seed(42), frames.clone()).unwrap();
    background.start(DisplayList::new(), 800, 600);
    frames.fire();

    let before = background.with_field(|f| f.particles().to_vec()).unwrap();
    background.on_resize(400, 300);

    let unchanged = background.with_field(|f| f.particles().to_vec()).unwrap();
    assert_eq!(unchanged, before);

    frames.fire();
    background
        .with_field(|f| {
            assert_eq!(f.particles().len(), 50);
            assert_eq!(f.size(), Vec2::new(400.0, 300.0));
            for p in f.particles() {
                assert!((0.0..=400.0).contains(&p.position.x));
                assert!((0.0..=300.0).contains(&p.position.y));
            }
            // Survivors carry the identity they were born with.
            for p in f.particles().iter().filter(|p| p.age > 0) {
                assert!(before
                    .iter()
                    .any(|b| b.hue == p.hue && b.lifespan == p.lifespan && b.age + 1 == p.age));
            }
        })
        .unwrap();
}
