use tracing::{debug, info};

use crate::config::{GameConfig, EXTRA_LIFE_BANNER_SECS, PLAYER_RADIUS};
use crate::entities::{Registry, Ship, Shot};
use crate::error::GameResult;
use crate::field::AsteroidField;
use crate::geometry::{colliding, Bounds, Vector2};
use crate::input::{Action, KeySnapshot};
use crate::lives::LivesManager;
use crate::particles::{ExplosionSize, Palette, ParticleSystem};
use crate::render::{Align, Renderer, Rgb};
use crate::scores::{ScoreManager, Tier};
use crate::states::{Context, GameOverState, GameState, PausedState, Transition};

const FLASH_HZ: f64 = 8.0;
const TRAIL_COLOR: Rgb = Rgb(255, 140, 0);
const MUZZLE_COLOR: Rgb = Rgb(255, 255, 200);

fn explosion_count(tier: Tier) -> usize {
    match tier {
        Tier::Large => 30,
        Tier::Medium => 20,
        Tier::Small => 12,
    }
}

/// One play session: the ship, the rocks, the score and the lives.
pub struct PlayingState {
    bounds: Bounds,
    ship: Ship,
    registry: Registry,
    field: AsteroidField,
    particles: ParticleSystem,
    scores: ScoreManager,
    lives: LivesManager,
    /// Seconds since the last extra life was awarded, while the banner shows.
    banner: Option<f64>,
    started: bool,
}

impl PlayingState {
    pub fn new(config: &GameConfig) -> GameResult<Self> {
        let bounds = Bounds::new(config.screen_width, config.screen_height);
        Ok(Self {
            bounds,
            ship: Ship::new(bounds.center()),
            registry: Registry::default(),
            field: AsteroidField::default(),
            particles: ParticleSystem::new(),
            scores: ScoreManager::with_threshold(&config.high_score_path, config.extra_life_threshold),
            lives: LivesManager::new(config.initial_lives, config.invincibility_secs)?,
            banner: None,
            started: false,
        })
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn scores(&self) -> &ScoreManager {
        &self.scores
    }

    pub fn lives(&self) -> &LivesManager {
        &self.lives
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn banner_visible(&self) -> bool {
        self.banner.is_some()
    }

    /// Returns true if the ship was hit, which ends collision handling for
    /// this tick.
    fn ship_collisions(&mut self, ctx: &mut Context) -> bool {
        let Some(index) = self
            .registry
            .asteroids
            .iter()
            .position(|rock| colliding(rock, &self.ship))
        else {
            return false;
        };
        if self.lives.is_invincible() {
            return false;
        }

        self.particles.emit_explosion(
            self.ship.position,
            30,
            ExplosionSize::Large,
            Palette::Red,
            ctx.rng.as_mut(),
        );
        ctx.audio.play_sound("player_death");
        // The rock breaks on the hull but scores nothing.
        let rock = self.registry.asteroids.remove(index);
        rock.split(&mut self.registry, ctx.rng.as_mut());

        if self.lives.lose_life() {
            let new_record = self.scores.is_new_high_score();
            self.scores.save_high_score();
            info!(
                "Game over with {} points (high score {})",
                self.scores.score(),
                self.scores.high_score()
            );
            ctx.change_state(Transition::to(GameOverState::new(
                self.scores.score(),
                self.scores.high_score(),
                new_record,
            )));
        } else {
            debug!("Ship destroyed, {} lives left", self.lives.lives());
            self.ship.respawn(self.bounds.center());
        }
        true
    }

    fn shot_collisions(&mut self, ctx: &mut Context) -> GameResult<()> {
        let rocks = std::mem::take(&mut self.registry.asteroids);
        for rock in rocks {
            let Some(hit) = self
                .registry
                .shots
                .iter()
                .position(|shot| colliding(&rock, shot))
            else {
                self.registry.asteroids.push(rock);
                continue;
            };
            self.registry.shots.swap_remove(hit);

            let tier = rock.tier();
            self.particles.emit_explosion(
                rock.position,
                explosion_count(tier),
                ExplosionSize::from(tier),
                Palette::Orange,
                ctx.rng.as_mut(),
            );
            ctx.audio.play_sound(&format!("explosion_{}", tier.label()));

            let points = rock.split(&mut self.registry, ctx.rng.as_mut());
            self.scores.add_score(i64::from(points))?;
            if self.scores.check_extra_life() {
                self.lives.add_life();
                self.banner = Some(0.0);
                ctx.audio.play_sound("extra_life");
                info!("Extra life at {} points", self.scores.score());
            }
        }
        Ok(())
    }

    fn emit_thrust_trail(&mut self, direction: f64) {
        let forward = self.ship.forward();
        let exhaust = self.ship.position - forward * (PLAYER_RADIUS * direction);
        self.particles
            .emit_trail(exhaust, forward * (-100.0 * direction), 2, TRAIL_COLOR, 0.3, 2.0);
    }

    fn emit_muzzle_burst(&mut self, ctx: &mut Context) {
        let forward = self.ship.forward();
        let nose = self.ship.position + forward * PLAYER_RADIUS;
        self.particles.emit_burst(
            nose,
            forward,
            4,
            40.0,
            MUZZLE_COLOR,
            (60.0, 120.0),
            (0.1, 0.2),
            ctx.rng.as_mut(),
        );
    }

    fn draw_hud(&self, renderer: &mut dyn Renderer) {
        let hud = [
            format!("Score: {}", self.scores.score()),
            format!("High Score: {}", self.scores.high_score()),
            format!("Lives: {}", self.lives.lives()),
        ];
        for (i, line) in hud.iter().enumerate() {
            renderer.draw_text(
                line,
                Vector2::new(10.0, 10.0 + i as f64 * 40.0),
                Align::Left,
                36.0,
                Rgb::WHITE,
            );
        }

        let remaining = self.lives.invincibility_time_remaining();
        if remaining > 0.0 {
            renderer.draw_text(
                &format!("Invincible: {:.1}s", remaining),
                Vector2::new(10.0, 130.0),
                Align::Left,
                24.0,
                Rgb::YELLOW,
            );
        }

        if let Some(elapsed) = self.banner {
            let pulse = (elapsed * 4.0).sin().abs();
            let green = (128.0 + 127.0 * pulse) as u8;
            renderer.draw_text(
                "EXTRA LIFE!",
                Vector2::new(self.bounds.width / 2.0, self.bounds.height / 2.0 - 100.0),
                Align::Center,
                48.0,
                Rgb(0, green, 0),
            );
        }
    }
}

impl GameState for PlayingState {
    fn name(&self) -> &'static str {
        "Playing"
    }

    fn enter(&mut self, ctx: &mut Context) {
        if self.started {
            info!("Resumed Playing State");
            return;
        }
        self.started = true;
        info!("Entered Playing State");
        let music = ctx.music_path("gameplay");
        ctx.audio.play_music(&music, true);
    }

    fn exit(&mut self, _ctx: &mut Context) {
        info!("Exited Playing State");
    }

    fn update(&mut self, dt: f64, input: &KeySnapshot, ctx: &mut Context) -> GameResult<()> {
        let bounds = self.bounds;
        let frame = self
            .ship
            .update(dt, input, &mut self.registry, ctx.audio.as_mut(), bounds);
        self.field
            .update(dt, &mut self.registry, bounds, ctx.rng.as_mut());
        for rock in &mut self.registry.asteroids {
            rock.update(dt, bounds);
        }
        for shot in &mut self.registry.shots {
            shot.update(dt, bounds);
        }
        self.registry.shots.retain(Shot::is_alive);

        self.particles.update(dt);
        if frame.thrust != 0.0 {
            self.emit_thrust_trail(frame.thrust.signum());
        }
        if frame.fired {
            self.emit_muzzle_burst(ctx);
        }
        if let Some(elapsed) = self.banner.as_mut() {
            *elapsed += dt;
            if *elapsed >= EXTRA_LIFE_BANNER_SECS {
                self.banner = None;
            }
        }

        if self.ship_collisions(ctx) {
            return Ok(());
        }
        self.shot_collisions(ctx)
    }

    fn draw(&self, renderer: &mut dyn Renderer) {
        renderer.clear(Rgb::BLACK);
        for rock in &self.registry.asteroids {
            rock.draw(renderer);
        }
        for shot in &self.registry.shots {
            shot.draw(renderer);
        }
        self.particles.draw(renderer);

        let remaining = self.lives.invincibility_time_remaining();
        let visible = remaining <= 0.0 || ((remaining * FLASH_HZ) as i64) % 2 == 0;
        if visible {
            self.ship.draw(renderer, Rgb::WHITE);
        }
        self.draw_hud(renderer);
    }

    fn handle_event(&mut self, action: Action, ctx: &mut Context) -> GameResult<()> {
        // No pausing into a session that has already ended.
        if self.lives.is_game_over() {
            return Ok(());
        }
        if matches!(action, Action::Pause | Action::Back) {
            ctx.change_state(Transition::Suspend(Box::new(PausedState::new())));
        }
        Ok(())
    }
}
