use thiserror::Error;

use crate::replay::Score;
use crate::retry::Retryable;
use crate::score::ScoreStore;

/// Failure to fetch one player's scores.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// May succeed on a later attempt.
    #[error("temporary failure: {0}")]
    Transient(String),
    #[error("{0}")]
    Fatal(String),
}

impl Retryable for FetchError {
    fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

/// Where the generator gets a player's scores from.
///
/// An empty list is a valid answer and is never retried.
pub trait ScoreSource: Send + Sync {
    fn fetch_scores(&self, username: &str) -> Result<Vec<Score>, FetchError>;
}

/// The local database: the player's group-best scores. Never fails.
impl ScoreSource for ScoreStore {
    fn fetch_scores(&self, username: &str) -> Result<Vec<Score>, FetchError> {
        Ok(self.best_scores_by_username(username))
    }
}
