use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{
    ASTEROID_KINDS, ASTEROID_MIN_RADIUS, EXTRA_LIFE_THRESHOLD, LARGE_ASTEROID_POINTS,
    MEDIUM_ASTEROID_POINTS, SMALL_ASTEROID_POINTS,
};
use crate::error::{GameError, GameResult};

/// Asteroid size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Large,
    Medium,
    Small,
}

impl Tier {
    pub fn of(radius: f64, min_radius: f64, kinds: u32) -> Tier {
        if radius >= min_radius * kinds as f64 {
            Tier::Large
        } else if radius >= min_radius * 2.0 {
            Tier::Medium
        } else {
            Tier::Small
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Tier::Large => LARGE_ASTEROID_POINTS,
            Tier::Medium => MEDIUM_ASTEROID_POINTS,
            Tier::Small => SMALL_ASTEROID_POINTS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Large => "large",
            Tier::Medium => "medium",
            Tier::Small => "small",
        }
    }
}

/// The single scoring rule for destroying an asteroid of `radius`.
pub fn points_for_radius(radius: f64, min_radius: f64, kinds: u32) -> u32 {
    Tier::of(radius, min_radius, kinds).points()
}

#[derive(Serialize, Deserialize)]
struct HighScoreRecord {
    high_score: u64,
}

/// Session score, the persisted high score, and extra-life milestones.
#[derive(Debug, Clone)]
pub struct ScoreManager {
    score: u64,
    high_score: u64,
    last_extra_life: u64,
    threshold: u64,
    path: PathBuf,
}

impl ScoreManager {
    /// Reads the high score from `path` straight away; a bad file means 0.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_threshold(path, EXTRA_LIFE_THRESHOLD)
    }

    pub fn with_threshold(path: impl Into<PathBuf>, threshold: u64) -> Self {
        let mut manager = ScoreManager {
            score: 0,
            high_score: 0,
            last_extra_life: 0,
            threshold: threshold.max(1),
            path: path.into(),
        };
        manager.load_high_score();
        manager
    }

    pub fn add_score(&mut self, points: i64) -> GameResult<()> {
        if points < 0 {
            return Err(GameError::InvalidArgument(format!(
                "points cannot be negative ({})",
                points
            )));
        }
        self.score += points as u64;
        Ok(())
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
        self.last_extra_life = 0;
    }

    pub fn points_for_asteroid(&self, radius: f64) -> u32 {
        points_for_radius(radius, ASTEROID_MIN_RADIUS, ASTEROID_KINDS)
    }

    /// True once per crossed milestone. A single award that jumps several
    /// milestones still reports once and snaps the marker to the highest.
    pub fn check_extra_life(&mut self) -> bool {
        if self.score >= self.last_extra_life + self.threshold {
            self.last_extra_life = (self.score / self.threshold) * self.threshold;
            return true;
        }
        false
    }

    pub fn is_new_high_score(&self) -> bool {
        self.score > self.high_score
    }

    pub fn save_high_score(&mut self) {
        if self.is_new_high_score() {
            self.high_score = self.score;
        }
        if let Err(e) = write_record(&self.path, self.high_score) {
            warn!("Could not save high score: {}", e);
        } else {
            info!("High score {} saved to {}", self.high_score, self.path.display());
        }
    }

    pub fn load_high_score(&mut self) {
        self.high_score = match read_record(&self.path) {
            Ok(value) => value,
            Err(e) => {
                if self.path.exists() {
                    warn!("Could not load high score: {}", e);
                }
                0
            }
        };
    }
}

fn read_record(path: &Path) -> GameResult<u64> {
    let failure = |reason: String| GameError::PersistenceFailure {
        path: path.to_path_buf(),
        reason,
    };
    let text = fs::read_to_string(path).map_err(|e| failure(e.to_string()))?;
    let record: HighScoreRecord =
        serde_json::from_str(&text).map_err(|e| failure(e.to_string()))?;
    Ok(record.high_score)
}

fn write_record(path: &Path, high_score: u64) -> GameResult<()> {
    let failure = |reason: String| GameError::PersistenceFailure {
        path: path.to_path_buf(),
        reason,
    };
    let json = serde_json::to_string_pretty(&HighScoreRecord { high_score })
        .map_err(|e| failure(e.to_string()))?;
    fs::write(path, json).map_err(|e| failure(e.to_string()))
}
