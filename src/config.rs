// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::treasury_client::BASE_URL;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const BASE_URL_ENV: &str = "TREASURY_FX_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the Fiscal Data API, without the rates-of-exchange endpoint.
    pub base_url: String,
    pub timeout_secs: u64,
    /// Where the interactive form writes its log.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            timeout_secs: 30,
            log_file: PathBuf::from("treasury-fx.log"),
        }
    }
}

impl Config {
    /// Replace `base_url` when an override is given and non-empty.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }
}

pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load an explicitly requested file, or `config.toml` when it exists, or the
/// defaults. The base URL can then be overridden from the environment.
pub fn resolve_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            load_config(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Config::default(),
    };

    Ok(config.with_base_url_override(env::var(BASE_URL_ENV).ok()))
}

pub fn save_config(config: &Config, path: &Path) -> anyhow::Result<()> {
    let config_str = toml::to_string_pretty(config)?;
    fs::write(path, config_str)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(
            config.base_url,
            "https://api.fiscaldata.treasury.gov/services/api/fiscal_service"
        );
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_file, PathBuf::from("treasury-fx.log"));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = 5\n")?;

        let config = load_config(&path)?;
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.base_url, BASE_URL);
        Ok(())
    }

    #[test]
    fn test_save_then_load() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        let config = Config {
            base_url: "http://localhost:9000".to_string(),
            timeout_secs: 10,
            log_file: PathBuf::from("/tmp/fx.log"),
        };

        save_config(&config, &path)?;
        assert_eq!(load_config(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(resolve_config(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_invalid_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"\n")?;
        assert!(load_config(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_base_url_override() {
        let config = Config::default().with_base_url_override(Some("http://proxy".to_string()));
        assert_eq!(config.base_url, "http://proxy");

        let config = Config::default().with_base_url_override(Some("  ".to_string()));
        assert_eq!(config.base_url, BASE_URL);

        let config = Config::default().with_base_url_override(None);
        assert_eq!(config.base_url, BASE_URL);
    }
}
