//! Error taxonomy for the game core.
//!
//! Only [`GameError::InvalidConfiguration`] and [`GameError::InvalidArgument`]
//! ever reach the frame loop; both are contract violations. The other two are
//! built, logged and dropped where they occur so play continues with defaults.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A manager or config value was constructed with an impossible setting.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A caller passed a value the operation does not accept.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An audio device or asset could not be opened.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// The high-score document could not be read or written.
    #[error("persistence failure at {}: {reason}", path.display())]
    PersistenceFailure { path: PathBuf, reason: String },
}

pub type GameResult<T> = Result<T, GameError>;

impl GameError {
    /// True for the variants that indicate a programming error rather than a
    /// degraded environment.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::InvalidConfiguration(_) | GameError::InvalidArgument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatal_classification() {
        assert!(GameError::InvalidConfiguration("lives".into()).is_fatal());
        assert!(GameError::InvalidArgument("points".into()).is_fatal());
        assert!(!GameError::ResourceUnavailable("mixer".into()).is_fatal());
        let persist = GameError::PersistenceFailure {
            path: PathBuf::from("high_score.json"),
            reason: "bad json".into(),
        };
        assert!(!persist.is_fatal());
        assert_eq!(
            persist.to_string(),
            "persistence failure at high_score.json: bad json"
        );
    }
}
