use crate::audio::AudioPort;
use crate::config::{
    PLAYER_ACCELERATION, PLAYER_DRAG, PLAYER_RADIUS, PLAYER_SHOOT_COOLDOWN, PLAYER_SHOOT_SPEED,
    PLAYER_TURN_SPEED, TARGET_FPS,
};
use crate::entities::{Registry, Shot};
use crate::geometry::{wrap, Bounds, CircleBody, Vector2};
use crate::input::{Action, KeySnapshot};
use crate::render::{Renderer, Rgb};

/// What the ship did this frame, for cosmetic follow-up by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShipFrame {
    /// +1.0 forward, -1.0 reverse, 0.0 coasting.
    pub thrust: f64,
    pub fired: bool,
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub position: Vector2,
    pub velocity: Vector2,
    /// Degrees clockwise from screen-up.
    pub rotation: f64,
    shoot_cooldown: f64,
}

impl Ship {
    pub fn new(position: Vector2) -> Self {
        Self {
            position,
            velocity: Vector2::ZERO,
            rotation: 0.0,
            shoot_cooldown: 0.0,
        }
    }

    pub fn forward(&self) -> Vector2 {
        Vector2::from_heading(self.rotation)
    }

    pub fn shoot_cooldown(&self) -> f64 {
        self.shoot_cooldown
    }

    pub fn rotate(&mut self, dt: f64) {
        self.rotation += PLAYER_TURN_SPEED * dt;
    }

    pub fn thrust(&mut self, dt: f64, sign: f64) {
        self.velocity += self.forward() * (PLAYER_ACCELERATION * sign * dt);
    }

    /// Drag is tuned per 60 Hz frame and scaled to `dt` so it feels the same
    /// at any frame rate.
    pub fn apply_drag(&mut self, dt: f64) {
        self.velocity *= PLAYER_DRAG.powf(dt * TARGET_FPS);
    }

    pub fn update(
        &mut self,
        dt: f64,
        input: &KeySnapshot,
        registry: &mut Registry,
        audio: &mut dyn AudioPort,
        bounds: Bounds,
    ) -> ShipFrame {
        let mut frame = ShipFrame::default();
        self.shoot_cooldown = (self.shoot_cooldown - dt).max(0.0);

        if input.is_held(Action::TurnLeft) {
            self.rotate(-dt);
        }
        if input.is_held(Action::TurnRight) {
            self.rotate(dt);
        }
        if input.is_held(Action::ThrustForward) {
            self.thrust(dt, 1.0);
            frame.thrust += 1.0;
        }
        if input.is_held(Action::ThrustBack) {
            self.thrust(dt, -1.0);
            frame.thrust -= 1.0;
        }
        if input.is_held(Action::Fire) {
            frame.fired = self.shoot(registry, audio);
        }

        self.apply_drag(dt);
        self.position += self.velocity * dt;
        wrap(&mut self.position, bounds);
        frame
    }

    /// Fire if the cooldown allows. Returns whether a shot was created.
    pub fn shoot(&mut self, registry: &mut Registry, audio: &mut dyn AudioPort) -> bool {
        if self.shoot_cooldown > 0.0 {
            return false;
        }
        Shot::spawn(registry, self.position, self.forward() * PLAYER_SHOOT_SPEED);
        self.shoot_cooldown = PLAYER_SHOOT_COOLDOWN;
        audio.play_sound("shoot");
        true
    }

    pub fn respawn(&mut self, position: Vector2) {
        self.position = position;
        self.velocity = Vector2::ZERO;
        self.rotation = 0.0;
    }

    pub fn triangle(&self) -> [Vector2; 3] {
        let forward = self.forward();
        let right = forward.rotate(90.0) * (PLAYER_RADIUS / 1.5);
        [
            self.position + forward * PLAYER_RADIUS,
            self.position - forward * PLAYER_RADIUS - right,
            self.position - forward * PLAYER_RADIUS + right,
        ]
    }

    pub fn draw(&self, renderer: &mut dyn Renderer, color: Rgb) {
        renderer.draw_polygon(&self.triangle(), color, 2.0);
    }
}

impl CircleBody for Ship {
    fn position(&self) -> Vector2 {
        self.position
    }

    fn radius(&self) -> f64 {
        PLAYER_RADIUS
    }
}
