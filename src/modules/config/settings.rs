use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{CONFIG_FILE, DATA_DIR_ENV, DEFAULT_DATA_DIR, LOG_FILE};

/// Optional overrides read from `<data_dir>/config.json`
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Resolved application settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_file: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Built-in defaults rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            log_file: data_dir.join(LOG_FILE),
            data_dir,
            log_level: "info".to_string(),
        }
    }

    /// Data directory from the environment, falling back to the default
    pub fn default_data_dir() -> PathBuf {
        std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Defaults, then `config.json` in the data directory if present
    pub fn load(data_dir: impl Into<PathBuf>) -> Result<Self, String> {
        let mut config = Self::with_data_dir(data_dir);
        let path = config.config_path();

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(config),
            Err(e) => return Err(format!("Failed to read {}: {}", path.display(), e)),
        };

        let overrides: ConfigFile = serde_json::from_str(&contents)
            .map_err(|e| format!("Invalid configuration in {}: {}", path.display(), e))?;
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(&mut self, overrides: ConfigFile) {
        if let Some(log_file) = overrides.log_file {
            // Relative paths are taken relative to the data directory
            self.log_file = if log_file.is_absolute() {
                log_file
            } else {
                self.data_dir.join(log_file)
            };
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
    }

    /// Write the current log settings back to `config.json`
    pub fn save(&self) -> Result<(), String> {
        fs::create_dir_all(&self.data_dir)
            .map_err(|e| format!("Failed to create {}: {}", self.data_dir.display(), e))?;

        let file = ConfigFile {
            log_file: Some(self.log_file.clone()),
            log_level: Some(self.log_level.clone()),
        };
        let data = serde_json::to_string_pretty(&file)
            .map_err(|e| format!("Failed to serialize configuration: {}", e))?;

        fs::write(self.config_path(), data)
            .map_err(|e| format!("Failed to write configuration: {}", e))
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Unknown level names fall back to `Info`
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    pub fn storage_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::with_data_dir("/tmp/links");
        assert_eq!(config.log_file, PathBuf::from("/tmp/links").join(LOG_FILE));
        assert_eq!(config.level_filter(), LevelFilter::Info);
        assert_eq!(config.storage_dir(), Path::new("/tmp/links"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::with_data_dir(dir.path()));
    }

    #[test]
    fn test_file_overrides() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"log_file":"logs/app.log","log_level":"debug"}"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.log_file, dir.path().join("logs/app.log"));
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_partial_and_invalid_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"log_level":"chatty"}"#).unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.log_file, dir.path().join(LOG_FILE));
        assert_eq!(config.level_filter(), LevelFilter::Info);

        fs::write(dir.path().join(CONFIG_FILE), "not-json").unwrap();
        assert!(AppConfig::load(dir.path()).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut config = AppConfig::with_data_dir(dir.path().join("data"));
        config.log_level = "warn".to_string();
        config.save().unwrap();

        let reloaded = AppConfig::load(dir.path().join("data")).unwrap();
        assert_eq!(reloaded, config);
    }
}
