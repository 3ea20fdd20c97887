//! Cosmetic particle effects: explosions, directional bursts and thrust trails.
//!
//! Particles never feed back into gameplay; nothing outside
//! [`ParticleSystem`] holds one.

use rand::{Rng, RngCore};

use crate::geometry::Vector2;
use crate::render::{Renderer, Rgb};
use crate::scores::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionSize {
    Small,
    Medium,
    Large,
}

impl ExplosionSize {
    fn speed_range(self) -> (f64, f64) {
        match self {
            ExplosionSize::Small => (50.0, 150.0),
            ExplosionSize::Medium => (75.0, 200.0),
            ExplosionSize::Large => (100.0, 250.0),
        }
    }

    fn lifetime_range(self) -> (f64, f64) {
        match self {
            ExplosionSize::Small => (0.5, 1.5),
            ExplosionSize::Medium => (0.8, 2.0),
            ExplosionSize::Large => (1.0, 2.5),
        }
    }

    fn particle_size(self) -> f64 {
        match self {
            ExplosionSize::Small => 2.0,
            ExplosionSize::Medium => 3.0,
            ExplosionSize::Large => 4.0,
        }
    }
}

impl From<Tier> for ExplosionSize {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Large => ExplosionSize::Large,
            Tier::Medium => ExplosionSize::Medium,
            Tier::Small => ExplosionSize::Small,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Orange,
    Red,
}

impl Palette {
    fn colors(self) -> &'static [Rgb] {
        match self {
            Palette::Orange => &[
                Rgb(255, 165, 0),
                Rgb(255, 69, 0),
                Rgb(255, 140, 0),
                Rgb(255, 215, 0),
            ],
            Palette::Red => &[Rgb(255, 0, 0), Rgb(255, 100, 100), Rgb(200, 0, 0)],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vector2,
    pub velocity: Vector2,
    pub color: Rgb,
    pub size: f64,
    pub lifetime: f64,
    pub max_lifetime: f64,
    base_color: Rgb,
    base_size: f64,
}

impl Particle {
    pub fn new(position: Vector2, velocity: Vector2, color: Rgb, lifetime: f64, size: f64) -> Self {
        Self {
            position,
            velocity,
            color,
            size,
            lifetime,
            max_lifetime: lifetime,
            base_color: color,
            base_size: size,
        }
    }

    /// Move, age, and fade size and colour linearly with remaining life.
    pub fn update(&mut self, dt: f64) {
        self.position += self.velocity * dt;
        self.lifetime -= dt;
        if self.max_lifetime > 0.0 {
            let ratio = (self.lifetime / self.max_lifetime).max(0.0);
            self.size = self.base_size * ratio;
            self.color = self.base_color.scaled(ratio);
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        if self.is_alive() && self.size > 0.0 {
            renderer.draw_circle(self.position, self.size, self.color, 0.0);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn emit_explosion(
        &mut self,
        position: Vector2,
        count: usize,
        size: ExplosionSize,
        palette: Palette,
        rng: &mut dyn RngCore,
    ) {
        let (min_speed, max_speed) = size.speed_range();
        let (min_life, max_life) = size.lifetime_range();
        let colors = palette.colors();
        for _ in 0..count {
            let velocity = Vector2::from_heading(rng.gen_range(0.0..360.0))
                * rng.gen_range(min_speed..max_speed);
            let color = colors[rng.gen_range(0..colors.len())];
            let lifetime = rng.gen_range(min_life..max_life);
            self.particles.push(Particle::new(
                position,
                velocity,
                color,
                lifetime,
                size.particle_size(),
            ));
        }
    }

    /// Fan of particles around `direction`, `spread` degrees wide.
    #[allow(clippy::too_many_arguments)]
    pub fn emit_burst(
        &mut self,
        position: Vector2,
        direction: Vector2,
        count: usize,
        spread: f64,
        color: Rgb,
        speed: (f64, f64),
        lifetime: (f64, f64),
        rng: &mut dyn RngCore,
    ) {
        let base = direction.heading();
        let half = spread / 2.0;
        for _ in 0..count {
            let angle = base + if half > 0.0 { rng.gen_range(-half..half) } else { 0.0 };
            let velocity = Vector2::from_heading(angle) * rng.gen_range(speed.0..=speed.1);
            let life = rng.gen_range(lifetime.0..=lifetime.1);
            self.particles
                .push(Particle::new(position, velocity, color, life, 2.0));
        }
    }

    /// Particles strung out behind a moving object.
    pub fn emit_trail(
        &mut self,
        position: Vector2,
        velocity: Vector2,
        count: usize,
        color: Rgb,
        lifetime: f64,
        size: f64,
    ) {
        for i in 0..count {
            let offset = (i + 1) as f64 * 0.1;
            self.particles.push(Particle::new(
                position - velocity * offset,
                velocity * 0.1,
                color,
                lifetime,
                size,
            ));
        }
    }

    pub fn update(&mut self, dt: f64) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(Particle::is_alive);
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        for particle in &self.particles {
            particle.draw(renderer);
        }
    }
}
