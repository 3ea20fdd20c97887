use crate::config::{SHOT_LIFETIME, SHOT_RADIUS};
use crate::entities::Registry;
use crate::geometry::{wrap, Bounds, CircleBody, Vector2};
use crate::render::{Renderer, Rgb};

#[derive(Debug, Clone)]
pub struct Shot {
    pub position: Vector2,
    pub velocity: Vector2,
    remaining: f64,
}

impl Shot {
    pub fn new(position: Vector2, velocity: Vector2) -> Self {
        Self {
            position,
            velocity,
            remaining: SHOT_LIFETIME,
        }
    }

    /// Create a shot and register it with the active entity collections.
    pub fn spawn(registry: &mut Registry, position: Vector2, velocity: Vector2) {
        registry.shots.push(Shot::new(position, velocity));
    }

    pub fn update(&mut self, dt: f64, bounds: Bounds) {
        self.position += self.velocity * dt;
        wrap(&mut self.position, bounds);
        self.remaining -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.draw_circle(self.position, SHOT_RADIUS, Rgb::WHITE, 2.0);
    }
}

impl CircleBody for Shot {
    fn position(&self) -> Vector2 {
        self.position
    }

    fn radius(&self) -> f64 {
        SHOT_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_wraps_and_expires() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut shot = Shot::new(Vector2::new(95.0, 50.0), Vector2::new(500.0, 0.0));
        shot.update(0.02, bounds);
        assert_eq!(shot.position, Vector2::new(0.0, 50.0));
        assert!(shot.is_alive());

        shot.update(SHOT_LIFETIME, bounds);
        assert!(!shot.is_alive());
    }
}
