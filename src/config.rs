use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

const APP_DIR_NAME: &str = ".daftar_accounts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

/// Small persisted settings record. Nothing in here is required to run:
/// a missing or unreadable file simply means defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Last database opened, used when none is given explicitly
    pub database: Option<PathBuf>,
    pub window: Option<WindowGeometry>,
}

impl Config {
    /// Application data directory: `~/.daftar_accounts`.
    pub fn app_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME)
    }

    pub fn default_path() -> PathBuf {
        Self::app_dir().join("config.json")
    }

    pub fn default_database() -> PathBuf {
        Self::app_dir().join("accounts.db")
    }

    /// Load settings, falling back to defaults on any failure.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path)
            .context("Failed to read config")
            .and_then(|s| serde_json::from_str(&s).context("Failed to parse config"))
        {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Database to open: an explicit choice wins, then the remembered one,
    /// then the default location.
    pub fn resolve_database(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.database.clone())
            .unwrap_or_else(Self::default_database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_partial_geometry_is_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"window": {"x": 10, "y": 20, "w": 800}}"#).unwrap();
        // all four keys are required for a geometry to apply
        assert_eq!(Config::load_from(&path).window, None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            database: Some(PathBuf::from("/tmp/ledger.db")),
            window: Some(WindowGeometry {
                x: 10,
                y: 20,
                w: 1100,
                h: 720,
            }),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_resolve_database() {
        let config = Config {
            database: Some(PathBuf::from("remembered.db")),
            window: None,
        };
        assert_eq!(
            config.resolve_database(Some(PathBuf::from("explicit.db"))),
            PathBuf::from("explicit.db")
        );
        assert_eq!(config.resolve_database(None), PathBuf::from("remembered.db"));
        assert_eq!(
            Config::default().resolve_database(None),
            Config::default_database()
        );
    }
}
