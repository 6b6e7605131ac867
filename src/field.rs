//! The particle field simulator.
//!
//! [`ParticleField`] owns the particle population and runs one frame of the
//! update-and-draw cycle per [`tick`](ParticleField::tick). It knows nothing
//! about scheduling; [`AmbientBackground`](crate::AmbientBackground) drives it.
//!
//! # Frame order
//!
//! 1. Paint the trail color over the whole surface (no hard clear).
//! 2. Move, reflect, age and draw every particle with additive blending.
//! 3. Replace expired particles so the population is back to target.
//! 4. Link every pair closer than the link distance.

use crate::config::FieldConfig;
use crate::draw::DrawContext;
use crate::error::ConfigError;
use crate::links::for_each_link;
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::visuals::{BlendMode, Rgba, CORE_LIGHTNESS, GLOW_LIGHTNESS};
use glam::Vec2;

/// Running totals, for hosts and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStats {
    /// Ticks run since seeding.
    pub ticks: u64,
    /// Particles replaced since seeding.
    pub replaced: u64,
    /// Links drawn during the last tick.
    pub links: usize,
}

/// A fixed-size population of glowing, drifting particles.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: FieldConfig,
    spawner: SpawnContext,
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    stats: FieldStats,
}

impl ParticleField {
    /// Validate `config` and seed a full population on a `width x height`
    /// surface.
    pub fn new(config: FieldConfig, width: u32, height: u32) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::seeded(config, width, height))
    }

    /// Seed a field from a config that has already been validated.
    pub(crate) fn seeded(config: FieldConfig, width: u32, height: u32) -> Self {
        let mut field = Self {
            spawner: SpawnContext::new(config.seed),
            particles: Vec::with_capacity(config.population),
            width: width as f32,
            height: height as f32,
            stats: FieldStats::default(),
            config,
        };
        field.replenish();

        tracing::debug!(
            population = field.particles.len(),
            seed = field.spawner.seed(),
            width,
            height,
            "seeded particle field"
        );
        field
    }

    /// Live particles, in storage order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn stats(&self) -> FieldStats {
        self.stats
    }

    /// Current surface size used for reflection and the trail fill.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Change the surface size. Particles are left exactly where they are;
    /// the new bounds apply from the next tick.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
    }

    /// Run one frame: update every particle and draw the field into `ctx`.
    pub fn tick<C: DrawContext + ?Sized>(&mut self, ctx: &mut C) {
        let (width, height) = (self.width, self.height);

        ctx.set_blend_mode(BlendMode::Alpha);
        ctx.fill_rect(Vec2::ZERO, Vec2::new(width, height), self.config.trail);

        ctx.set_blend_mode(BlendMode::Additive);
        let mut survivors = Vec::with_capacity(self.config.population);
        for mut particle in self.particles.drain(..) {
            particle.advance(width, height);
            draw_particle(ctx, &particle, self.config.glow_scale);
            if !particle.is_expired() {
                survivors.push(particle);
            }
        }
        self.particles = survivors;
        let replaced = self.replenish();

        ctx.set_blend_mode(BlendMode::Alpha);
        let color = self.config.link_color;
        let link_width = self.config.link_width;
        let mut links = 0;
        for_each_link(
            &self.particles,
            self.config.link_distance,
            self.config.link_opacity,
            |link| {
                ctx.stroke_line(link.from, link.to, link_width, color.with_alpha(link.opacity));
                links += 1;
            },
        );

        self.stats.ticks += 1;
        self.stats.replaced += replaced as u64;
        self.stats.links = links;
    }

    /// Top the population back up to its target. Returns how many were added.
    fn replenish(&mut self) -> usize {
        let missing = self.config.population.saturating_sub(self.particles.len());
        for _ in 0..missing {
            let particle = self.spawner.spawn(&self.config, self.width, self.height);
            self.particles.push(particle);
        }
        missing
    }
}

/// Soft glow three core radii wide, then the solid core on top.
fn draw_particle<C: DrawContext + ?Sized>(ctx: &mut C, particle: &Particle, glow_scale: f32) {
    let opacity = particle.opacity();
    let glow = Rgba::hsla(particle.hue, 1.0, GLOW_LIGHTNESS, opacity);

    ctx.fill_radial_gradient(
        particle.position,
        particle.radius * glow_scale,
        glow,
        glow.with_alpha(0.0),
    );
    ctx.fill_circle(
        particle.position,
        particle.radius,
        Rgba::hsla(particle.hue, 1.0, CORE_LIGHTNESS, opacity),
    );
}
