use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::replay::{PlayMode, Score};

use super::mods::Mods;

/// Thresholds a score must meet to be placed in a generated collection.
///
/// Defaults accept every score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreSaveConditions {
    /// Inclusive lower accuracy bound in `[0, 1]`.
    pub min_accuracy: f64,
    /// Inclusive upper accuracy bound in `[0, 1]`.
    pub max_accuracy: f64,
    /// Every one of these mods must be active.
    #[serde(with = "super::mods::short_names")]
    pub required_mods: Mods,
    /// None of these mods may be active.
    #[serde(with = "super::mods::short_names")]
    pub forbidden_mods: Mods,
    /// Accepted modes; empty accepts all.
    pub modes: Vec<PlayMode>,
    pub min_total_score: i32,
}

impl Default for ScoreSaveConditions {
    fn default() -> Self {
        Self {
            min_accuracy: 0.0,
            max_accuracy: 1.0,
            required_mods: Mods::empty(),
            forbidden_mods: Mods::empty(),
            modes: Vec::new(),
            min_total_score: 0,
        }
    }
}

impl ScoreSaveConditions {
    /// Accepts scores with accuracy in `[min, max]`.
    pub fn accuracy_between(min: f64, max: f64) -> Self {
        Self {
            min_accuracy: min,
            max_accuracy: max,
            ..Self::default()
        }
    }

    pub fn is_eligible(&self, score: &Score) -> bool {
        let accuracy = score.accuracy();
        if accuracy < self.min_accuracy || accuracy > self.max_accuracy {
            return false;
        }
        if !score.mods.contains(self.required_mods) {
            return false;
        }
        if score.mods.intersects(self.forbidden_mods) {
            return false;
        }
        if !self.modes.is_empty() && !self.modes.contains(&score.mode) {
            return false;
        }
        score.total_score >= self.min_total_score
    }

    /// Rejects bounds that can never match.
    pub fn validate(&self) -> Result<()> {
        if self.min_accuracy.is_nan() || self.max_accuracy.is_nan() {
            return Err(Error::ConfigParseError(
                "accuracy bounds must be numbers".to_string(),
            ));
        }
        if self.min_accuracy > self.max_accuracy {
            return Err(Error::ConfigParseError(format!(
                "min_accuracy {} is greater than max_accuracy {}",
                self.min_accuracy, self.max_accuracy
            )));
        }
        if self.required_mods.intersects(self.forbidden_mods) {
            return Err(Error::ConfigParseError(format!(
                "mods {} are both required and forbidden",
                self.required_mods & self.forbidden_mods
            )));
        }
        Ok(())
    }
}
