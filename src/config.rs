use std::path::Path;

use tracing::warn;

use crate::ai::QLearningConfig;
use crate::error::ConfigError;
use crate::training::trainer::TrainerConfig;

/// Settings for the search-based players.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched by the Connect Four player. Tic-Tac-Toe is always
    /// searched to the end.
    pub connect_four_depth: usize,
    /// Use alpha-beta pruning instead of plain minimax.
    pub pruning: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            connect_four_depth: 4,
            pruning: true,
        }
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub qlearning: QLearningConfig,
    pub training: TrainerConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.connect_four_depth == 0 {
            return Err(ConfigError::Validation(
                "search.connect_four_depth must be >= 1".into(),
            ));
        }

        let q = &self.qlearning;
        if q.learning_rate <= 0.0 || q.learning_rate > 1.0 {
            return Err(ConfigError::Validation(
                "qlearning.learning_rate must be in (0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&q.discount) {
            return Err(ConfigError::Validation(
                "qlearning.discount must be in [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&q.epsilon) {
            return Err(ConfigError::Validation(
                "qlearning.epsilon must be in [0, 1]".into(),
            ));
        }
        let rewards = [q.step_penalty, q.win_reward, q.draw_reward, q.loss_reward];
        if rewards.iter().any(|r| !r.is_finite()) {
            return Err(ConfigError::Validation(
                "qlearning rewards must be finite".into(),
            ));
        }

        if self.training.num_episodes == 0 {
            return Err(ConfigError::Validation(
                "training.num_episodes must be > 0".into(),
            ));
        }
        if self.training.log_interval == 0 {
            return Err(ConfigError::Validation(
                "training.log_interval must be > 0".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::trainer::{OpponentKind, StartPolicy};
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        config.validate().expect("default config should be valid");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[qlearning]
learning_rate = 0.25
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!((config.qlearning.learning_rate - 0.25).abs() < 1e-12);
        // Other fields should be defaults
        assert!((config.qlearning.discount - 0.9).abs() < 1e-12);
        assert_eq!(config.search.connect_four_depth, 4);
        assert_eq!(config.training.num_episodes, 5000);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert!(config.search.pruning);
        assert_eq!(config.training.opponent, OpponentKind::Random);
        assert_eq!(config.training.agent_starts, StartPolicy::Alternate);
        assert_eq!(config.training.seed, None);
    }

    #[test]
    fn test_enum_values_parse_lowercase() {
        let toml_str = r#"
[training]
opponent = "minimax"
agent_starts = "never"
seed = 11
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.training.opponent, OpponentKind::Minimax);
        assert_eq!(config.training.agent_starts, StartPolicy::Never);
        assert_eq!(config.training.seed, Some(11));
    }

    #[test]
    fn test_unknown_opponent_is_parse_error() {
        let result: Result<AppConfig, _> = toml::from_str("[training]\nopponent = \"oracle\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_zero_depth() {
        let mut config = AppConfig::default();
        config.search.connect_four_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_learning_rate_out_of_range() {
        let mut config = AppConfig::default();
        config.qlearning.learning_rate = 0.0;
        assert!(config.validate().is_err());
        config.qlearning.learning_rate = 1.5;
        assert!(config.validate().is_err());
        config.qlearning.learning_rate = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_invalid_discount() {
        let mut config = AppConfig::default();
        config.qlearning.discount = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_invalid_epsilon() {
        let mut config = AppConfig::default();
        config.qlearning.epsilon = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_nan_reward() {
        let mut config = AppConfig::default();
        config.qlearning.loss_reward = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_episodes() {
        let mut config = AppConfig::default();
        config.training.num_episodes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_log_interval() {
        let mut config = AppConfig::default();
        config.training.log_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_eval_interval_disables_evaluation() {
        let mut config = AppConfig::default();
        config.training.eval_interval = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = AppConfig::load_or_default(Path::new("nonexistent_config.toml")).unwrap();
        assert_eq!(config.training.num_episodes, 5000);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            r#"
[search]
connect_four_depth = 6

[training]
num_episodes = 500
"#
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.search.connect_four_depth, 6);
        assert_eq!(config.training.num_episodes, 500);
        // Others are defaults
        assert!((config.qlearning.epsilon - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[qlearning]\ndiscount = 2.0\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::FileRead { .. })
        ));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = AppConfig::default_toml();
        let config: AppConfig = toml::from_str(&toml_str).unwrap();
        config.validate().expect("roundtripped config should be valid");
        assert_eq!(config.search.connect_four_depth, 4);
    }
}
