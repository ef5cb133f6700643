//! Configuration management for tudu.
//!
//! Loads configuration from ${TUDU_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
/// To update, edit default_config.toml directly.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for tudu configuration and data files.
    //!
    //! TUDU_HOME resolution order:
    //! 1. TUDU_HOME environment variable (if set)
    //! 2. ~/.config/tudu (default)

    use std::path::PathBuf;

    /// Returns the tudu home directory.
    ///
    /// Checks TUDU_HOME env var first, falls back to ~/.config/tudu
    pub fn tudu_home() -> PathBuf {
        if let Ok(home) = std::env::var("TUDU_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("tudu"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        tudu_home().join("config.toml")
    }

    /// Returns the path to the stored token file.
    pub fn tokens_path() -> PathBuf {
        tudu_home().join("tokens.json")
    }

    /// Returns the directory that holds rotated log files.
    pub fn logs_dir() -> PathBuf {
        tudu_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API server configuration.
    #[serde(default)]
    pub api: ApiConfig,
}

/// API server configuration entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Optional base URL of the todo API (overridden by TUDU_API_URL).
    pub base_url: Option<String>,
}

impl ApiConfig {
    /// Returns the effective base URL if set and non-empty.
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Config {
    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// Config loading: missing file returns defaults.
    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api.base_url, None);
    }

    /// Config loading: base URL read from the [api] table.
    #[test]
    fn test_load_base_url_from_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(
            &config_path,
            "[api]\nbase_url = \"https://todo.example.com/api\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(
            config.api.effective_base_url(),
            Some("https://todo.example.com/api")
        );
    }

    /// Base URL: empty/whitespace treated as unset.
    #[test]
    fn test_base_url_empty_is_none() {
        let config = Config {
            api: ApiConfig {
                base_url: Some("   ".to_string()),
            },
        };
        assert_eq!(config.api.effective_base_url(), None);
    }

    /// Config loading: unknown keys are tolerated (forward compatibility).
    #[test]
    fn test_load_ignores_unknown_keys() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "future_key = true\n[api]\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api.base_url, None);
    }

    /// Config init: creates file with template, creates parent dirs.
    #[test]
    fn test_init_creates_config_with_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        assert!(config_path.exists());
        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# tudu Configuration"));
        assert!(contents.contains("# base_url ="));
    }

    /// Config init: the generated template parses back into defaults.
    #[test]
    fn test_init_template_parses_as_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        Config::init(&config_path).unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.api.base_url, None);
    }

    /// Config init: fails if file exists (no silent overwrite).
    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        let result = Config::init(&config_path);
        assert!(result.is_err());
    }
}
