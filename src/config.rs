//! Configuration file handling.
//!
//! This module provides loading and saving of depgrave configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/depgrave/config.toml`
//! - macOS: `~/Library/Application Support/depgrave/config.toml`
//! - Windows: `%APPDATA%\depgrave\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! threshold_days = 365
//! request_delay_ms = 100
//! timeout_secs = 30
//! default_format = "table"
//!
//! [ignore]
//! packages = ["@types/*", "left-pad"]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::classifier::{ScanOptions, DEFAULT_REQUEST_DELAY, DEFAULT_THRESHOLD_DAYS};

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use depgrave::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Threshold: {} days", config.threshold_days);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Packages whose latest release is older than this many days are dead.
    ///
    /// Default: 365
    pub threshold_days: u32,

    /// Pause between registry requests, in milliseconds.
    ///
    /// Default: 100
    pub request_delay_ms: u64,

    /// Per-request timeout, in seconds.
    ///
    /// Default: 30
    pub timeout_secs: u64,

    /// Output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// Packages to leave out of the scan.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Package names excluded from scanning.
    ///
    /// Supports `*` wildcards (e.g., "@types/*", "eslint-*").
    pub packages: Vec<String>,
}

impl IgnoreConfig {
    /// Check if a package should be ignored.
    pub fn should_ignore_package(&self, name: &str) -> bool {
        self.packages.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, name)
            } else {
                pattern == name
            }
        })
    }

    /// Drops ignored names, keeping the order of the rest.
    pub fn filter_packages(&self, names: Vec<String>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| !self.should_ignore_package(name))
            .collect()
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    let first = parts[0];
    if !first.is_empty() {
        match remaining.strip_prefix(first) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    let last = parts[parts.len() - 1];
    if !last.is_empty() {
        match remaining.strip_suffix(last) {
            Some(rest) => remaining = rest,
            None => return false,
        }
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            request_delay_ms: DEFAULT_REQUEST_DELAY.as_millis() as u64,
            timeout_secs: 30,
            default_format: "table".to_string(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, falling back to defaults
    /// when the file is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("depgrave")
            .join("config.toml")
    }

    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            threshold_days: self.threshold_days,
            request_delay: self.request_delay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match_exact() {
        assert!(glob_match("lodash", "lodash"));
        assert!(!glob_match("lodash", "underscore"));
    }

    #[test]
    fn test_glob_match_prefix() {
        assert!(glob_match("eslint-*", "eslint-plugin-react"));
        assert!(glob_match("eslint-*", "eslint-"));
        assert!(!glob_match("eslint-*", "eslint"));
    }

    #[test]
    fn test_glob_match_suffix() {
        assert!(glob_match("*-loader", "babel-loader"));
        assert!(!glob_match("*-loader", "webpack"));
    }

    #[test]
    fn test_glob_match_scoped() {
        assert!(glob_match("@types/*", "@types/node"));
        assert!(!glob_match("@types/*", "@babel/core"));
    }

    #[test]
    fn test_glob_match_middle() {
        assert!(glob_match("@babel/*-preset-*", "@babel/plugin-preset-env"));
        assert!(!glob_match("@babel/*-preset-*", "@babel/core"));
    }

    #[test]
    fn test_filter_packages_keeps_order() {
        let ignore = IgnoreConfig {
            packages: vec!["left-pad".to_string(), "@types/*".to_string()],
        };
        let names = vec![
            "react".to_string(),
            "left-pad".to_string(),
            "@types/node".to_string(),
            "lodash".to_string(),
        ];

        assert_eq!(ignore.filter_packages(names), vec!["react", "lodash"]);
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.threshold_days, 365);
        assert_eq!(config.request_delay(), Duration::from_millis(100));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.default_format, "table");
        assert_eq!(config.scan_options(), ScanOptions::default());
        assert!(config.ignore.packages.is_empty());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threshold_days = 730\n\n[ignore]\npackages = [\"@types/*\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.threshold_days, 730);
        assert_eq!(config.request_delay_ms, 100);
        assert!(config.ignore.should_ignore_package("@types/react"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            threshold_days: 180,
            default_format: "json".to_string(),
            ..Config::default()
        };

        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "threshold_days = \"soon\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
