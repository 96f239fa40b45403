//! Configuration file loading for self-play.
//!
//! Settings come from `selfplay.toml` in the current directory when it
//! exists; every field has a default, so an empty or missing file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A value parsed but is out of range.
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Smallest accepted `takeback_every`.
pub const MIN_TAKEBACK_EVERY: u32 = 3;

/// Which chooser plays a side.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChooserKind {
    /// Uniformly random legal moves.
    #[default]
    Random,
    /// Never picks; the driver falls back to a random move every time.
    Abstain,
}

/// Self-play settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SelfPlayConfig {
    /// Stop after this many plies if the game has not ended.
    pub max_plies: u32,
    /// Seed for every random source. Unset means a fresh seed per run.
    pub seed: Option<u64>,
    pub white: ChooserKind,
    pub black: ChooserKind,
    /// How long to sleep between polls of the search worker.
    pub poll_interval_ms: u64,
    /// Every N turns, take back the last move while a search is running.
    /// At least [`MIN_TAKEBACK_EVERY`]: each takeback must follow two played
    /// plies or the game never advances.
    pub takeback_every: Option<u32>,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            max_plies: 200,
            seed: None,
            white: ChooserKind::Random,
            black: ChooserKind::Random,
            poll_interval_ms: 5,
            takeback_every: None,
        }
    }
}

impl SelfPlayConfig {
    /// Loads the configuration from `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses and validates configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: SelfPlayConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.takeback_every {
            if n < MIN_TAKEBACK_EVERY {
                return Err(ConfigError::Invalid {
                    field: "takeback_every",
                    reason: format!("must be at least {}, got {}", MIN_TAKEBACK_EVERY, n),
                });
            }
        }
        Ok(())
    }

    /// Returns the default configuration file path.
    pub fn config_path() -> PathBuf {
        PathBuf::from("selfplay.toml")
    }

    pub fn chooser_for(&self, white: bool) -> ChooserKind {
        if white {
            self.white
        } else {
            self.black
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
max_plies = 80
seed = 42
white = "random"
black = "abstain"
poll_interval_ms = 1
takeback_every = 5
"#;

        let config = SelfPlayConfig::parse(toml_content).unwrap();

        assert_eq!(config.max_plies, 80);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.white, ChooserKind::Random);
        assert_eq!(config.black, ChooserKind::Abstain);
        assert_eq!(config.poll_interval_ms, 1);
        assert_eq!(config.takeback_every, Some(5));
        assert_eq!(config.chooser_for(false), ChooserKind::Abstain);
    }

    #[test]
    fn test_parse_empty_config_uses_defaults() {
        let config = SelfPlayConfig::parse("").unwrap();
        assert_eq!(config, SelfPlayConfig::default());
    }

    #[test]
    fn test_parse_unknown_chooser() {
        let result = SelfPlayConfig::parse(r#"white = "minimax""#);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_takeback_every_must_make_progress() {
        for n in [0, 1, 2] {
            let result = SelfPlayConfig::parse(&format!("takeback_every = {}", n));
            assert!(
                matches!(
                    result,
                    Err(ConfigError::Invalid {
                        field: "takeback_every",
                        ..
                    })
                ),
                "takeback_every = {} should be rejected",
                n
            );
        }

        let config =
            SelfPlayConfig::parse(&format!("takeback_every = {}", MIN_TAKEBACK_EVERY)).unwrap();
        assert_eq!(config.takeback_every, Some(MIN_TAKEBACK_EVERY));
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let config = SelfPlayConfig::load(Path::new("/nonexistent/selfplay.toml")).unwrap();
        assert_eq!(config, SelfPlayConfig::default());
    }

    #[test]
    fn test_config_path() {
        assert_eq!(SelfPlayConfig::config_path(), PathBuf::from("selfplay.toml"));
    }
}
