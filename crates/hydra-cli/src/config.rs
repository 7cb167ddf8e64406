//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use hydra_store::{DEFAULT_CHECK_INTERVAL, DEFAULT_RETENTION_DAYS};

use crate::cli::{Cli, OutputFormat};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "HYDRA_CONFIG";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database file (default: platform data directory)
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Disable colored output
    #[serde(default)]
    pub no_color: bool,

    /// Default output format ("text" or "json")
    #[serde(default)]
    pub format: Option<String>,

    /// Minutes between expiry checks in `watch`
    #[serde(default)]
    pub watch_interval_minutes: Option<u64>,

    /// Days a record is kept before the sweep deletes it
    #[serde(default)]
    pub retention_days: Option<u32>,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hydratrack")
            .join("config.toml")
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from a specific file, or return default if not found
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config: {}", e);
                    }
                },
                Err(e) => {
                    eprintln!("Warning: Failed to read config: {}", e);
                }
            }
        }
        Self::default()
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// A config with every default spelled out, for `config init`.
    pub fn with_defaults() -> Self {
        Self {
            db_path: Some(hydra_store::default_db_path()),
            no_color: false,
            format: Some("text".to_string()),
            watch_interval_minutes: Some(DEFAULT_CHECK_INTERVAL.as_secs() / 60),
            retention_days: Some(DEFAULT_RETENTION_DAYS),
        }
    }
}

/// Resolve the output format: `--json`, then the command flag, then config.
pub fn resolve_format(json: bool, format: Option<OutputFormat>, config: &Config) -> OutputFormat {
    if json {
        return OutputFormat::Json;
    }
    format
        .or_else(|| config.format.as_deref().and_then(OutputFormat::from_config))
        .unwrap_or_default()
}

/// Resolve the database path: `--db`/`HYDRA_DB`, then config, then the platform default.
pub fn resolve_db_path(cli: &Cli, config: &Config) -> PathBuf {
    cli.db
        .clone()
        .or_else(|| config.db_path.clone())
        .unwrap_or_else(hydra_store::default_db_path)
}

/// Resolve the retention period in days.
pub fn resolve_retention(days: Option<u32>, config: &Config) -> u32 {
    days.or(config.retention_days)
        .filter(|d| *d > 0)
        .unwrap_or(DEFAULT_RETENTION_DAYS)
}

/// Resolve the watchdog interval in minutes.
pub fn resolve_interval(minutes: Option<u64>, config: &Config) -> u64 {
    minutes
        .or(config.watch_interval_minutes)
        .filter(|m| *m > 0)
        .unwrap_or(DEFAULT_CHECK_INTERVAL.as_secs() / 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_resolve_format_json_flag_wins() {
        let config = Config {
            format: Some("text".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_format(true, Some(OutputFormat::Text), &config),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_resolve_format_falls_back_to_config() {
        let config = Config {
            format: Some("json".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(false, None, &config), OutputFormat::Json);
        assert_eq!(
            resolve_format(false, Some(OutputFormat::Text), &config),
            OutputFormat::Text
        );
    }

    #[test]
    fn test_resolve_format_ignores_unknown_config_value() {
        let config = Config {
            format: Some("yaml".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_format(false, None, &config), OutputFormat::Text);
    }

    #[test]
    fn test_resolve_db_path_prefers_flag() {
        let cli = Cli::parse_from(["hydra", "--db", "/tmp/flag.db", "status"]);
        let config = Config {
            db_path: Some(PathBuf::from("/tmp/config.db")),
            ..Default::default()
        };
        assert_eq!(
            resolve_db_path(&cli, &config),
            PathBuf::from("/tmp/flag.db")
        );
    }

    #[test]
    fn test_resolve_retention() {
        let config = Config {
            retention_days: Some(14),
            ..Default::default()
        };
        assert_eq!(resolve_retention(Some(3), &config), 3);
        assert_eq!(resolve_retention(None, &config), 14);
        assert_eq!(resolve_retention(None, &Config::default()), 7);
    }

    #[test]
    fn test_resolve_interval() {
        assert_eq!(resolve_interval(None, &Config::default()), 60);
        let config = Config {
            watch_interval_minutes: Some(0),
            ..Default::default()
        };
        assert_eq!(resolve_interval(None, &config), 60);
        assert_eq!(resolve_interval(Some(5), &config), 5);
    }

    #[test]
    fn test_config_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            no_color: true,
            format: Some("json".to_string()),
            retention_days: Some(10),
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_load_missing_or_invalid_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Config::load_from(&path), Config::default());

        fs::write(&path, "retention_days = \"lots\"").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn test_partial_config_uses_serde_defaults() {
        let config: Config = toml::from_str("no_color = true").unwrap();
        assert!(config.no_color);
        assert_eq!(config.db_path, None);
        assert_eq!(config.retention_days, None);
    }
}
