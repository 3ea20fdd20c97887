use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::{DEFAULT_INITIAL_LIVES, DEFAULT_INVINCIBILITY_SECS};
use crate::error::{GameError, GameResult};

/// Life counter with a post-hit invincibility window.
///
/// Expiry is lazy: the window is only closed when [`LivesManager::is_invincible`]
/// notices that enough time has passed.
#[derive(Debug, Clone)]
pub struct LivesManager {
    initial_lives: u32,
    lives: u32,
    invincibility: Duration,
    invincible_since: Option<Instant>,
}

impl LivesManager {
    pub fn new(initial_lives: i32, invincibility_secs: f64) -> GameResult<Self> {
        if initial_lives < 0 {
            return Err(GameError::InvalidConfiguration(format!(
                "initial lives cannot be negative ({})",
                initial_lives
            )));
        }
        let invincibility = Duration::try_from_secs_f64(invincibility_secs).map_err(|e| {
            GameError::InvalidConfiguration(format!(
                "invincibility duration {} is out of range: {}",
                invincibility_secs, e
            ))
        })?;
        Ok(Self {
            initial_lives: initial_lives as u32,
            lives: initial_lives as u32,
            invincibility,
            invincible_since: None,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            initial_lives: DEFAULT_INITIAL_LIVES as u32,
            lives: DEFAULT_INITIAL_LIVES as u32,
            invincibility: Duration::from_secs_f64(DEFAULT_INVINCIBILITY_SECS),
            invincible_since: None,
        }
    }

    /// Take a hit. Returns true when no lives remain, including on repeat
    /// calls once the counter is already at zero.
    pub fn lose_life(&mut self) -> bool {
        if self.lives > 0 {
            self.lives -= 1;
            self.start_invincibility();
            debug!("Life lost, {} remaining", self.lives);
        }
        self.lives == 0
    }

    pub fn add_life(&mut self) {
        self.lives += 1;
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn initial_lives(&self) -> u32 {
        self.initial_lives
    }

    pub fn invincibility_duration(&self) -> Duration {
        self.invincibility
    }

    pub fn reset_lives(&mut self) {
        self.lives = self.initial_lives;
        self.invincible_since = None;
    }

    pub fn start_invincibility(&mut self) {
        self.invincible_since = Some(Instant::now());
    }

    pub fn is_invincible(&mut self) -> bool {
        let Some(since) = self.invincible_since else {
            return false;
        };
        if since.elapsed() >= self.invincibility {
            self.invincible_since = None;
            return false;
        }
        true
    }

    /// Seconds of invincibility left; exactly 0.0 once the window has run out.
    pub fn invincibility_time_remaining(&self) -> f64 {
        match self.invincible_since {
            Some(since) => self
                .invincibility
                .saturating_sub(since.elapsed())
                .as_secs_f64(),
            None => 0.0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }
}
