use rand::{Rng, RngCore};
use tracing::debug;

use crate::config::{
    ASTEROID_MAX_RADIUS, ASTEROID_MAX_SPEED, ASTEROID_MIN_SPEED, ASTEROID_SPAWN_CONE,
    ASTEROID_SPAWN_RATE,
};
use crate::entities::{Asteroid, Registry};
use crate::geometry::{Bounds, Vector2};

/// Periodically launches full-size asteroids from a random point on the
/// playfield edge, heading roughly inward.
#[derive(Debug, Clone)]
pub struct AsteroidField {
    timer: f64,
    interval: f64,
}

impl Default for AsteroidField {
    fn default() -> Self {
        Self::new(ASTEROID_SPAWN_RATE)
    }
}

impl AsteroidField {
    pub fn new(interval: f64) -> Self {
        Self {
            timer: 0.0,
            interval,
        }
    }

    pub fn update(&mut self, dt: f64, registry: &mut Registry, bounds: Bounds, rng: &mut dyn RngCore) {
        self.timer += dt;
        if self.timer > self.interval {
            self.timer = 0.0;
            self.spawn(registry, bounds, rng);
        }
    }

    pub fn spawn(&self, registry: &mut Registry, bounds: Bounds, rng: &mut dyn RngCore) {
        // Edge position and the inward normal of that edge.
        let (position, inward) = match rng.gen_range(0..4) {
            0 => (
                Vector2::new(0.0, rng.gen_range(0.0..bounds.height)),
                Vector2::new(1.0, 0.0),
            ),
            1 => (
                Vector2::new(bounds.width, rng.gen_range(0.0..bounds.height)),
                Vector2::new(-1.0, 0.0),
            ),
            2 => (
                Vector2::new(rng.gen_range(0.0..bounds.width), 0.0),
                Vector2::new(0.0, 1.0),
            ),
            _ => (
                Vector2::new(rng.gen_range(0.0..bounds.width), bounds.height),
                Vector2::new(0.0, -1.0),
            ),
        };
        let speed = rng.gen_range(ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED);
        let velocity = inward.rotate(rng.gen_range(-ASTEROID_SPAWN_CONE..ASTEROID_SPAWN_CONE)) * speed;
        debug!(
            "Spawning asteroid at ({:.0}, {:.0}) speed {:.0}",
            position.x, position.y, speed
        );
        Asteroid::spawn(registry, position, velocity, ASTEROID_MAX_RADIUS, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn spawns_on_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut registry = Registry::default();
        let mut field = AsteroidField::new(0.8);
        let bounds = Bounds::new(1280.0, 720.0);

        field.update(0.5, &mut registry, bounds, &mut rng);
        assert!(registry.asteroids.is_empty());
        field.update(0.5, &mut registry, bounds, &mut rng);
        assert_eq!(registry.asteroids.len(), 1);
        field.update(0.5, &mut registry, bounds, &mut rng);
        assert_eq!(registry.asteroids.len(), 1);
    }

    #[test]
    fn spawned_rocks_start_on_edge_heading_inward() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut registry = Registry::default();
        let field = AsteroidField::default();
        let bounds = Bounds::new(1280.0, 720.0);
        for _ in 0..50 {
            field.spawn(&mut registry, bounds, &mut rng);
        }
        // cos(30°) of the speed always points along the edge normal.
        let min_inward = ASTEROID_MIN_SPEED * 0.86;
        for rock in &registry.asteroids {
            let (p, v) = (rock.position, rock.velocity);
            assert_eq!(rock.radius, ASTEROID_MAX_RADIUS);

            let speed = v.length();
            assert!(speed >= ASTEROID_MIN_SPEED - 1e-9 && speed < ASTEROID_MAX_SPEED + 1e-9);

            let inward = if p.x == 0.0 {
                v.x
            } else if p.x == bounds.width {
                -v.x
            } else if p.y == 0.0 {
                v.y
            } else if p.y == bounds.height {
                -v.y
            } else {
                panic!("{:?} not on the perimeter", p);
            };
            assert!(inward > min_inward, "{:?} heads outward", v);
        }
    }
}
