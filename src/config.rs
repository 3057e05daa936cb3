use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio_system::LifecyclePolicy;
use crate::error::ConfigError;

const APP_DIR: &str = "MultiTrackAudio";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log command and fade activity at debug level
    pub debug_logs: bool,

    /// Directory holding one sub-directory per category (`bgm/`, `bgs/`, ...)
    pub audio_root: PathBuf,

    /// Upper bound on the time between fade ticks, in milliseconds
    pub tick_interval_ms: u64,

    /// Which host events silence the overlay channels
    pub lifecycle: LifecyclePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug_logs: false,
            audio_root: PathBuf::from("audio"),
            tick_interval_ms: 16, // ~60 ticks per second
            lifecycle: LifecyclePolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`.
    /// Creates a default config there if the file doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            tracing::info!("Created default config at: {}", path.display());
            return Ok(config);
        }

        let load_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::LoadFailed {
                path: path.display().to_string(),
                source,
            }
        };
        let content = fs::read_to_string(path).map_err(|e| load_failed(Box::new(e)))?;
        let config: Config = serde_json::from_str(&content).map_err(|e| load_failed(Box::new(e)))?;
        config.validate()?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ConfigError::DirectoryCreationFailed {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| {
            ConfigError::SaveFailed {
                path: path.display().to_string(),
                source,
            }
        };
        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Platform config directory for this application
    pub fn app_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR))
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        Self::app_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.json")
    }

    /// Directory for rolling log files
    pub fn log_dir() -> PathBuf {
        Self::app_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::AudioCategory;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("multitrack-audio-config-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.debug_logs);
        assert_eq!(config.audio_root, PathBuf::from("audio"));
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
        assert!(config.lifecycle.stop_on_title);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config {
            debug_logs: true,
            ..Config::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(
            r#"{ "debug_logs": true, "lifecycle": { "battle_start_categories": ["bgm"] } }"#,
        )
        .unwrap();
        assert!(config.debug_logs);
        assert_eq!(config.tick_interval_ms, 16);
        assert_eq!(config.lifecycle.battle_start_categories, vec![AudioCategory::Bgm]);
        assert!(config.lifecycle.stop_on_new_game);
    }

    #[test]
    fn test_load_creates_default_file() {
        let path = temp_path("create");
        let _ = fs::remove_file(&path);

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let config = Config {
            tick_interval_ms: 10,
            audio_root: PathBuf::from("/srv/game/audio"),
            ..Config::default()
        };
        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let path = temp_path("invalid");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{ "tick_interval_ms": 0 }"#).unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Invalid(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::LoadFailed { .. })));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
