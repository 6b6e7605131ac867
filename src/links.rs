//! Faint lines between nearby particles.
//!
//! Every unordered pair is checked once per frame. With the default
//! population of 50 that is 1225 distance checks, cheap enough that no spatial
//! index is used.

use crate::particle::Particle;
use glam::Vec2;

/// A line to draw between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

/// Opacity of a link between two particles `distance` apart.
///
/// Falls off linearly from `max_opacity` at distance 0 to 0 at
/// `max_distance`. Returns `None` past `max_distance`.
#[inline]
pub fn link_opacity(distance: f32, max_distance: f32, max_opacity: f32) -> Option<f32> {
    if distance > max_distance {
        return None;
    }
    Some((1.0 - distance / max_distance) * max_opacity)
}

/// Call `f` for every pair of particles within `max_distance` of each other.
pub fn for_each_link<F>(particles: &[Particle], max_distance: f32, max_opacity: f32, mut f: F)
where
    F: FnMut(Link),
{
    let max_sq = max_distance * max_distance;

    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let dist_sq = a.position.distance_squared(b.position);
            if dist_sq > max_sq {
                continue;
            }
            if let Some(opacity) = link_opacity(dist_sq.sqrt(), max_distance, max_opacity) {
                f(Link {
                    from: a.position,
                    to: b.position,
                    opacity,
                });
            }
        }
    }
}

/// Collect every link into a `Vec`.
pub fn links(particles: &[Particle], max_distance: f32, max_opacity: f32) -> Vec<Link> {
    let mut out = Vec::new();
    for_each_link(particles, max_distance, max_opacity, |link| out.push(link));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            radius: 1.0,
            base_opacity: 0.5,
            hue: 220.0,
            age: 0,
            lifespan: 200,
        }
    }

    #[test]
    fn test_opacity_thresholds() {
        assert_eq!(link_opacity(0.0, 100.0, 0.3), Some(0.3));
        let half = link_opacity(50.0, 100.0, 0.3).unwrap();
        assert!((half - 0.15).abs() < 1e-6);
        assert_eq!(link_opacity(100.0, 100.0, 0.3), Some(0.0));
        assert_eq!(link_opacity(100.01, 100.0, 0.3), None);
    }

    #[test]
    fn test_pairs_counted_once() {
        let particles = [at(0.0, 0.0), at(10.0, 0.0), at(20.0, 0.0)];
        let found = links(&particles, 100.0, 0.3);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_far_pairs_skipped() {
        let particles = [at(0.0, 0.0), at(60.0, 80.0), at(300.0, 300.0)];
        let found = links(&particles, 100.0, 0.3);
        // (0,0)-(60,80) is exactly 100 apart; the third is far from both.
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].opacity, 0.0);
        assert_eq!(found[0].from, Vec2::ZERO);
        assert_eq!(found[0].to, Vec2::new(60.0, 80.0));
    }

    #[test]
    fn test_empty_and_single() {
        assert!(links(&[], 100.0, 0.3).is_empty());
        assert!(links(&[at(1.0, 1.0)], 100.0, 0.3).is_empty());
    }
}
