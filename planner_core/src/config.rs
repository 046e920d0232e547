//! Configuration file support for the study planner.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/studyplan/config.toml`.

use crate::{Difficulty, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub user: UserConfig,

    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Which user id plans are filed under when none is given
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_user")]
    pub default_user: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_user: default_user(),
        }
    }
}

/// Tunables for plan generation and day packing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    /// Longest single session, in minutes
    #[serde(default = "default_session_minutes")]
    pub session_minutes: u32,

    /// Break inserted after every session, in minutes
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,

    /// Hour of day the first session starts
    #[serde(default = "default_day_start_hour")]
    pub day_start_hour: u32,

    /// Stop placing sessions once the day's hours are used up
    #[serde(default)]
    pub enforce_daily_budget: bool,

    #[serde(default)]
    pub difficulty: DifficultyWeights,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            session_minutes: default_session_minutes(),
            break_minutes: default_break_minutes(),
            day_start_hour: default_day_start_hour(),
            enforce_daily_budget: false,
            difficulty: DifficultyWeights::default(),
        }
    }
}

impl PlannerConfig {
    /// Session cap in hours
    pub fn session_cap_hours(&self) -> f64 {
        f64::from(self.session_minutes) / 60.0
    }

    /// Break length in hours
    pub fn break_hours(&self) -> f64 {
        f64::from(self.break_minutes) / 60.0
    }

    /// Check that packing parameters make sense
    pub fn validate(&self) -> Result<()> {
        if self.session_minutes == 0 {
            return Err(Error::Config("session_minutes must be positive".into()));
        }
        if self.day_start_hour >= 24 {
            return Err(Error::Config(format!(
                "day_start_hour must be below 24, got {}",
                self.day_start_hour
            )));
        }
        for (name, value) in [
            ("easy", self.difficulty.easy),
            ("medium", self.difficulty.medium),
            ("hard", self.difficulty.hard),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "difficulty multiplier '{}' must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Difficulty multipliers applied per topic
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DifficultyWeights {
    #[serde(default = "default_easy")]
    pub easy: f64,

    #[serde(default = "default_medium")]
    pub medium: f64,

    #[serde(default = "default_hard")]
    pub hard: f64,
}

impl Default for DifficultyWeights {
    fn default() -> Self {
        Self {
            easy: default_easy(),
            medium: default_medium(),
            hard: default_hard(),
        }
    }
}

impl DifficultyWeights {
    /// Multiplier for a difficulty; unrecognised values count as 1
    pub fn multiplier(&self, difficulty: &Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Unrecognized(_) => 1.0,
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("studyplan")
}

fn default_user() -> String {
    "default".into()
}

fn default_session_minutes() -> u32 {
    50
}

fn default_break_minutes() -> u32 {
    15
}

fn default_day_start_hour() -> u32 {
    9
}

fn default_easy() -> f64 {
    1.0
}

fn default_medium() -> f64 {
    1.5
}

fn default_hard() -> f64 {
    2.5
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.planner.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("studyplan").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.user.default_user, "default");
        assert_eq!(config.planner.session_minutes, 50);
        assert_eq!(config.planner.break_minutes, 15);
        assert_eq!(config.planner.day_start_hour, 9);
        assert!(!config.planner.enforce_daily_budget);
        assert_eq!(config.planner.difficulty.hard, 2.5);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[planner]
break_minutes = 10

[planner.difficulty]
hard = 3.0
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.planner.break_minutes, 10);
        assert_eq!(config.planner.session_minutes, 50); // default
        assert_eq!(config.planner.difficulty.hard, 3.0);
        assert_eq!(config.planner.difficulty.medium, 1.5); // default
    }

    #[test]
    fn test_save_and_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.user.default_user = "alice".into();
        config.planner.enforce_daily_budget = true;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.user.default_user, "alice");
        assert_eq!(loaded.planner, config.planner);
    }

    #[test]
    fn test_validate_rejects_zero_session() {
        let planner = PlannerConfig {
            session_minutes: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(planner.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_late_start() {
        let planner = PlannerConfig {
            day_start_hour: 24,
            ..PlannerConfig::default()
        };
        assert!(planner.validate().is_err());
    }

    #[test]
    fn test_unrecognized_difficulty_multiplier_is_one() {
        let weights = DifficultyWeights::default();
        assert_eq!(
            weights.multiplier(&Difficulty::Unrecognized("brutal".into())),
            1.0
        );
        assert_eq!(weights.multiplier(&Difficulty::Medium), 1.5);
    }
}
