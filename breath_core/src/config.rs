//! Configuration file support for breathe.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/breathe/config.toml`.

use crate::{BreathingTechnique, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub techniques: TechniquesConfig,
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

/// Session runtime configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_technique")]
    pub default_technique: String,

    /// Wall-clock length of one tick. Each tick is one second of session time.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default = "default_haptics")]
    pub haptics: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_technique: default_technique(),
            tick_interval_ms: default_tick_interval_ms(),
            haptics: default_haptics(),
        }
    }
}

/// XP and level parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    #[serde(default = "default_xp_per_cycle")]
    pub xp_per_cycle: u32,

    #[serde(default = "default_completion_bonus")]
    pub completion_bonus: u32,

    #[serde(default = "default_xp_per_level")]
    pub xp_per_level: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_cycle: default_xp_per_cycle(),
            completion_bonus: default_completion_bonus(),
            xp_per_level: default_xp_per_level(),
        }
    }
}

/// User-defined techniques merged into the built-in catalog
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct TechniquesConfig {
    #[serde(default)]
    pub custom: Vec<BreathingTechnique>,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("breathe")
}

fn default_technique() -> String {
    "box".into()
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_haptics() -> bool {
    true
}

fn default_xp_per_cycle() -> u32 {
    5
}

fn default_completion_bonus() -> u32 {
    20
}

fn default_xp_per_level() -> u32 {
    100
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
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
        config.check()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("breathe").join("config.toml")
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

    fn check(&self) -> Result<()> {
        if self.session.tick_interval_ms == 0 {
            return Err(Error::Config("session.tick_interval_ms must be > 0".into()));
        }
        if self.progression.xp_per_level == 0 {
            return Err(Error::Config("progression.xp_per_level must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.session.default_technique, "box");
        assert_eq!(config.session.tick_interval_ms, 1000);
        assert!(config.session.haptics);
        assert_eq!(config.progression.xp_per_level, 100);
        assert!(config.techniques.custom.is_empty());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[session]
tick_interval_ms = 250
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.session.tick_interval_ms, 250);
        assert_eq!(config.session.default_technique, "box"); // default
        assert_eq!(config.progression.xp_per_cycle, 5); // default
    }

    #[test]
    fn test_custom_techniques_parse() {
        let toml_str = r#"
[[techniques.custom]]
id = "triangle"
name = "Triangle Breathing"
inhale = 3
hold = 3
exhale = 3
cycles = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let custom = &config.techniques.custom[0];
        assert_eq!(custom.id, "triangle");
        assert_eq!(custom.rest, 0);
        assert_eq!(custom.description, "");
    }

    #[test]
    fn test_save_and_load_from() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.session.default_technique = "relaxing".into();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.session.default_technique, "relaxing");
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[session]\ntick_interval_ms = 0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
