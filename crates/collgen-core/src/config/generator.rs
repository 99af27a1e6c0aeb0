use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::score::ScoreSaveConditions;

/// Input of one collection generation run.
///
/// ```toml
/// usernames = ["alice", "bob"]
/// collection_name_format = "{0} {1} plays"
///
/// [conditions]
/// min_accuracy = 0.95
/// forbidden_mods = "NF"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfiguration {
    /// Players to process, in order.
    pub usernames: Vec<String>,
    /// Name template. `{0}` is the username, `{1}` the mod string.
    pub collection_name_format: String,
    #[serde(default)]
    pub conditions: ScoreSaveConditions,
}

impl GeneratorConfiguration {
    pub fn new<I, S>(usernames: I, collection_name_format: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            usernames: usernames.into_iter().map(Into::into).collect(),
            collection_name_format: collection_name_format.into(),
            conditions: ScoreSaveConditions::default(),
        }
    }

    pub fn with_conditions(mut self, conditions: ScoreSaveConditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Load and validate a configuration file. `.json` files are read as JSON,
    /// anything else as TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::parse_json(&content)?,
            _ => Self::parse(&content)?,
        };
        debug!(
            "Loaded generator configuration from {:?}: {} usernames",
            path,
            config.usernames.len()
        );
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.usernames.is_empty() {
            return Err(Error::ConfigParseError(
                "at least one username is required".to_string(),
            ));
        }
        if let Some(blank) = self.usernames.iter().position(|u| u.trim().is_empty()) {
            return Err(Error::ConfigParseError(format!(
                "username #{} is blank",
                blank + 1
            )));
        }
        if self.collection_name_format.is_empty() {
            return Err(Error::ConfigParseError(
                "collection_name_format must not be empty".to_string(),
            ));
        }
        self.conditions.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::PlayMode;
    use crate::score::Mods;

    #[test]
    fn test_parse_full() {
        let config = GeneratorConfiguration::parse(
            r#"
usernames = ["alice", "bob"]
collection_name_format = "{0} {1} plays"

[conditions]
min_accuracy = 0.95
required_mods = "HD"
forbidden_mods = "NF"
modes = ["Osu", "Taiko"]
"#,
        )
        .unwrap();

        assert_eq!(config.usernames, vec!["alice", "bob"]);
        assert_eq!(config.collection_name_format, "{0} {1} plays");
        assert_eq!(config.conditions.min_accuracy, 0.95);
        assert_eq!(config.conditions.max_accuracy, 1.0);
        assert_eq!(config.conditions.required_mods, Mods::HIDDEN);
        assert_eq!(config.conditions.forbidden_mods, Mods::NO_FAIL);
        assert_eq!(config.conditions.modes, vec![PlayMode::Osu, PlayMode::Taiko]);
    }

    #[test]
    fn test_conditions_default_when_omitted() {
        let config =
            GeneratorConfiguration::parse("usernames = [\"a\"]\ncollection_name_format = \"{0}\"")
                .unwrap();
        assert_eq!(config.conditions, ScoreSaveConditions::default());
    }

    #[test]
    fn test_empty_usernames_rejected() {
        let err =
            GeneratorConfiguration::parse("usernames = []\ncollection_name_format = \"{0}\"")
                .unwrap_err();
        assert!(matches!(err, Error::ConfigParseError(_)));
    }

    #[test]
    fn test_empty_template_rejected() {
        let err = GeneratorConfiguration::new(["a"], "").validate().unwrap_err();
        assert!(matches!(err, Error::ConfigParseError(_)));
    }

    #[test]
    fn test_inverted_accuracy_rejected() {
        let config = GeneratorConfiguration::new(["a"], "{0}")
            .with_conditions(ScoreSaveConditions::accuracy_between(0.9, 0.8));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let err = GeneratorConfiguration::parse("usernames = [").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generator.toml");
        fs::write(&path, "usernames = [\"carol\"]\ncollection_name_format = \"{0}\"\n").unwrap();

        let config = GeneratorConfiguration::load(&path).unwrap();
        assert_eq!(config.usernames, vec!["carol"]);
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("generator.json");
        fs::write(
            &path,
            r#"{"usernames": ["dave"], "collection_name_format": "{0} {1}",
               "conditions": {"min_accuracy": 0.9, "required_mods": "HDHR"}}"#,
        )
        .unwrap();

        let config = GeneratorConfiguration::load(&path).unwrap();
        assert_eq!(config.usernames, vec!["dave"]);
        assert_eq!(
            config.conditions.required_mods,
            Mods::HIDDEN | Mods::HARD_ROCK
        );
    }

    #[test]
    fn test_malformed_json_is_json_error() {
        let err = GeneratorConfiguration::parse_json("{").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
