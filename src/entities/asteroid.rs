use rand::{Rng, RngCore};
use tracing::debug;

use crate::config::{
    ASTEROID_KINDS, ASTEROID_MAX_SPIN, ASTEROID_MIN_RADIUS, ASTEROID_MIN_SPEED, ASTEROID_VERTICES,
    SPLIT_MAX_ANGLE, SPLIT_MIN_ANGLE, SPLIT_SPEEDUP,
};
use crate::entities::Registry;
use crate::geometry::{wrap, Bounds, CircleBody, Vector2};
use crate::render::{Renderer, Rgb};
use crate::scores::{points_for_radius, Tier};

const ROTATION_JITTER: f64 = 30.0;
const SPIN_JITTER: f64 = 45.0;

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub position: Vector2,
    pub velocity: Vector2,
    pub radius: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    /// Per-vertex radius multipliers, fixed for the life of the rock.
    shape: [f64; ASTEROID_VERTICES],
}

fn sample_shape(rng: &mut dyn RngCore) -> [f64; ASTEROID_VERTICES] {
    let mut shape = [1.0; ASTEROID_VERTICES];
    for m in shape.iter_mut() {
        *m = rng.gen_range(0.75..1.15);
    }
    shape
}

impl Asteroid {
    pub fn new(position: Vector2, velocity: Vector2, radius: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            position,
            velocity,
            radius,
            rotation: rng.gen_range(0.0..360.0),
            rotation_speed: rng.gen_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN),
            shape: sample_shape(rng),
        }
    }

    /// Create an asteroid and register it with the active entity collections.
    pub fn spawn(
        registry: &mut Registry,
        position: Vector2,
        velocity: Vector2,
        radius: f64,
        rng: &mut dyn RngCore,
    ) {
        registry
            .asteroids
            .push(Asteroid::new(position, velocity, radius, rng));
    }

    pub fn update(&mut self, dt: f64, bounds: Bounds) {
        self.position += self.velocity * dt;
        self.rotation += self.rotation_speed * dt;
        wrap(&mut self.position, bounds);
    }

    pub fn tier(&self) -> Tier {
        Tier::of(self.radius, ASTEROID_MIN_RADIUS, ASTEROID_KINDS)
    }

    pub fn shape(&self) -> &[f64; ASTEROID_VERTICES] {
        &self.shape
    }

    /// Destroy this asteroid, registering two smaller fragments unless it is
    /// already at the minimum size. Returns the points it is worth; awarding
    /// them is up to the caller.
    pub fn split(self, registry: &mut Registry, rng: &mut dyn RngCore) -> u32 {
        let points = points_for_radius(self.radius, ASTEROID_MIN_RADIUS, ASTEROID_KINDS);
        if self.radius <= ASTEROID_MIN_RADIUS {
            return points;
        }

        let new_radius = self.radius - ASTEROID_MIN_RADIUS;
        let angle = rng.gen_range(SPLIT_MIN_ANGLE..SPLIT_MAX_ANGLE);
        // A resting parent still has to throw its fragments apart.
        let base = if self.velocity.length() > f64::EPSILON {
            self.velocity
        } else {
            Vector2::from_heading(rng.gen_range(0.0..360.0)) * ASTEROID_MIN_SPEED
        };

        for sign in [1.0, -1.0] {
            let mut child = Asteroid::new(
                self.position,
                base.rotate(sign * angle) * SPLIT_SPEEDUP,
                new_radius,
                rng,
            );
            child.rotation = self.rotation + rng.gen_range(-ROTATION_JITTER..ROTATION_JITTER);
            child.rotation_speed =
                self.rotation_speed + rng.gen_range(-SPIN_JITTER..SPIN_JITTER);
            registry.asteroids.push(child);
        }
        debug!(
            "Asteroid r={} split into two r={} at ±{:.1}°",
            self.radius, new_radius, angle
        );
        points
    }

    pub fn outline(&self) -> Vec<Vector2> {
        let step = 360.0 / ASTEROID_VERTICES as f64;
        self.shape
            .iter()
            .enumerate()
            .map(|(i, m)| {
                self.position
                    + Vector2::from_heading(self.rotation + i as f64 * step) * (self.radius * m)
            })
            .collect()
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_polygon(&self.outline(), Rgb::WHITE, 2.0);
    }
}

impl CircleBody for Asteroid {
    fn position(&self) -> Vector2 {
        self.position
    }

    fn radius(&self) -> f64 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rock(radius: f64, rng: &mut StdRng) -> Asteroid {
        let mut a = Asteroid::new(Vector2::new(100.0, 100.0), Vector2::new(50.0, 0.0), radius, rng);
        a.rotation = 45.0;
        a.rotation_speed = 90.0;
        a
    }

    #[test]
    fn smallest_asteroid_vanishes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut registry = Registry::default();
        let points = rock(ASTEROID_MIN_RADIUS, &mut rng).split(&mut registry, &mut rng);
        assert_eq!(points, 100);
        assert!(registry.asteroids.is_empty());
    }

    #[test]
    fn medium_asteroid_splits_in_two() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut registry = Registry::default();
        let points = rock(ASTEROID_MIN_RADIUS * 2.0, &mut rng).split(&mut registry, &mut rng);
        assert_eq!(points, 50);
        assert_eq!(registry.asteroids.len(), 2);

        let (a, b) = (&registry.asteroids[0], &registry.asteroids[1]);
        assert_ne!(a.velocity, b.velocity);
        assert!(a.velocity.length() > 0.0 && b.velocity.length() > 0.0);
        assert_eq!(a.radius, ASTEROID_MIN_RADIUS);
        assert_eq!(a.position, Vector2::new(100.0, 100.0));
    }

    #[test]
    fn fragments_diverge_symmetrically() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut registry = Registry::default();
        let points = rock(ASTEROID_MIN_RADIUS * 3.0, &mut rng).split(&mut registry, &mut rng);
        assert_eq!(points, 20);

        let parent_heading = Vector2::new(50.0, 0.0).heading();
        let left = registry.asteroids[0].velocity.heading() - parent_heading;
        let right = registry.asteroids[1].velocity.heading() - parent_heading;
        assert!((left + right).abs() < 1e-6);
        assert!(left.abs() >= SPLIT_MIN_ANGLE && left.abs() <= SPLIT_MAX_ANGLE);
        let speed = registry.asteroids[0].velocity.length();
        assert!((speed - 50.0 * SPLIT_SPEEDUP).abs() < 1e-6);
    }

    #[test]
    fn resting_parent_still_throws_fragments() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut registry = Registry::default();
        let mut parent = rock(ASTEROID_MIN_RADIUS * 2.0, &mut rng);
        parent.velocity = Vector2::ZERO;
        parent.split(&mut registry, &mut rng);
        for child in &registry.asteroids {
            assert!(child.velocity.length() > 0.0);
        }
        assert_ne!(registry.asteroids[0].velocity, registry.asteroids[1].velocity);
    }

    #[test]
    fn same_seed_same_trajectories() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut registry = Registry::default();
            rock(ASTEROID_MIN_RADIUS * 3.0, &mut rng).split(&mut registry, &mut rng);
            registry
                .asteroids
                .iter()
                .map(|a| a.velocity)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(9), run(9));
    }

    #[test]
    fn update_spins_and_wraps() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut a = rock(40.0, &mut rng);
        a.position = Vector2::new(1279.0, 10.0);
        a.update(0.1, Bounds::new(1280.0, 720.0));
        assert_eq!(a.position.x, 0.0);
        assert!((a.rotation - 54.0).abs() < 1e-9);
    }

    #[test]
    fn outline_is_stable_between_draws() {
        let mut rng = StdRng::seed_from_u64(6);
        let a = rock(60.0, &mut rng);
        assert_eq!(a.outline(), a.outline());
        assert_eq!(a.outline().len(), ASTEROID_VERTICES);
        for m in a.shape() {
            assert!((0.75..1.15).contains(m));
        }
    }
}
