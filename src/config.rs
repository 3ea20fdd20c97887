//! Gameplay constants and the runtime [`GameConfig`].
//!
//! The constants are the tuning of the physics "feel" and stay compile-time.
//! `GameConfig` carries the session-level knobs and is read from a TOML file;
//! any key left out falls back to the default below.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{GameError, GameResult};

pub const SCREEN_WIDTH: f64 = 1280.0;
pub const SCREEN_HEIGHT: f64 = 720.0;
pub const TARGET_FPS: f64 = 60.0;

pub const PLAYER_RADIUS: f64 = 20.0;
pub const PLAYER_TURN_SPEED: f64 = 300.0;
pub const PLAYER_ACCELERATION: f64 = 300.0;
/// Velocity retained per frame at 60 Hz.
pub const PLAYER_DRAG: f64 = 0.99;
pub const PLAYER_SHOOT_SPEED: f64 = 500.0;
pub const PLAYER_SHOOT_COOLDOWN: f64 = 0.3;

pub const SHOT_RADIUS: f64 = 5.0;
pub const SHOT_LIFETIME: f64 = 1.2;

pub const ASTEROID_MIN_RADIUS: f64 = 20.0;
pub const ASTEROID_KINDS: u32 = 3;
pub const ASTEROID_MAX_RADIUS: f64 = ASTEROID_MIN_RADIUS * ASTEROID_KINDS as f64;
pub const ASTEROID_SPAWN_RATE: f64 = 0.8;
pub const ASTEROID_MIN_SPEED: f64 = 40.0;
pub const ASTEROID_MAX_SPEED: f64 = 100.0;
pub const ASTEROID_SPAWN_CONE: f64 = 30.0;
pub const ASTEROID_MAX_SPIN: f64 = 90.0;
pub const ASTEROID_VERTICES: usize = 10;
pub const SPLIT_MIN_ANGLE: f64 = 20.0;
pub const SPLIT_MAX_ANGLE: f64 = 50.0;
pub const SPLIT_SPEEDUP: f64 = 1.2;

pub const LARGE_ASTEROID_POINTS: u32 = 20;
pub const MEDIUM_ASTEROID_POINTS: u32 = 50;
pub const SMALL_ASTEROID_POINTS: u32 = 100;

pub const DEFAULT_INITIAL_LIVES: i32 = 3;
pub const DEFAULT_INVINCIBILITY_SECS: f64 = 2.0;
pub const EXTRA_LIFE_THRESHOLD: u64 = 10_000;
pub const EXTRA_LIFE_BANNER_SECS: f64 = 3.0;

const CONFIG_ENV: &str = "ASTEROIDS_CONFIG";
const CONFIG_FILE: &str = "asteroids.toml";
const HIGH_SCORE_FILE: &str = "high_score.json";

/// Session settings. Every field has a default, so a partial TOML file is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    pub initial_lives: i32,
    pub invincibility_secs: f64,
    pub extra_life_threshold: u64,
    pub high_score_path: PathBuf,
    pub sounds_dir: PathBuf,
    pub music_volume: f64,
    pub sound_volume: f64,
    /// False swaps the sound board for a silent port.
    pub audio: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            initial_lives: DEFAULT_INITIAL_LIVES,
            invincibility_secs: DEFAULT_INVINCIBILITY_SECS,
            extra_life_threshold: EXTRA_LIFE_THRESHOLD,
            high_score_path: default_high_score_path(),
            sounds_dir: PathBuf::from("sounds"),
            music_volume: 0.7,
            sound_volume: 0.8,
            audio: true,
        }
    }
}

// Store next to the executable, like the arcade's score table.
fn default_high_score_path() -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(HIGH_SCORE_FILE);
        }
    }
    PathBuf::from(HIGH_SCORE_FILE)
}

impl GameConfig {
    /// Load from `$ASTEROIDS_CONFIG` or `./asteroids.toml`, falling back to
    /// defaults when the file is absent or unreadable.
    pub fn load_or_default() -> Self {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                info!("No config at {}, using defaults", path.display());
                return Self::default();
            }
        };
        match toml::from_str::<GameConfig>(&text) {
            Ok(config) => {
                info!("Configuration loaded from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Invalid config {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.initial_lives < 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "initial_lives must be >= 0, got {}",
                self.initial_lives
            )));
        }
        if Duration::try_from_secs_f64(self.invincibility_secs).is_err() {
            return Err(GameError::InvalidConfiguration(format!(
                "invincibility_secs must be a non-negative duration, got {}",
                self.invincibility_secs
            )));
        }
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(GameError::InvalidConfiguration(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.extra_life_threshold == 0 {
            return Err(GameError::InvalidConfiguration(
                "extra_life_threshold must be > 0".into(),
            ));
        }
        Ok(())
    }
}
