//! Configuration management for the placetrack CLI and SDK

use config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{Result, TrackError};

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration, layered from defaults, the config file and
/// `PLACETRACK_*` environment variables (highest precedence).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API root, e.g. `http://localhost:8000/api`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    pub verbose: bool,
    /// Where the persisted token entries live
    pub token_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            verbose: false,
            token_path: default_token_path(),
        }
    }
}

impl Config {
    /// Load from the default config path, creating the file on first run.
    pub async fn load() -> Result<Self> {
        Self::load_from(&default_config_path()).await
    }

    /// Load from an explicit path, layering file and environment sources.
    pub async fn load_from(config_file: &Path) -> Result<Self> {
        if !config_file.exists() {
            let config = Self::default();
            config.save(config_file).await?;
            return Ok(config);
        }

        let defaults = Self::default();
        let builder = ConfigLoader::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("timeout", defaults.timeout as i64)?
            .set_default("verbose", defaults.verbose)?
            .set_default(
                "token_path",
                defaults.token_path.to_string_lossy().to_string(),
            )?
            .add_source(File::from(config_file))
            .add_source(Environment::with_prefix("PLACETRACK").try_parsing(true));

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(TrackError::invalid_input("Base URL cannot be empty"));
        }
        if self.timeout == 0 {
            return Err(TrackError::invalid_input("Timeout must be positive"));
        }
        Ok(())
    }

    /// Join an endpoint path onto the base URL.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

/// Default config file location, `~/.config/placetrack/config.json` on Linux.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("placetrack")
        .join("config.json")
}

/// Default token storage location, kept out of the config directory so the
/// config file can be shared without leaking credentials.
pub fn default_token_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("placetrack")
        .join("tokens.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_cleanly() {
        let config = Config {
            base_url: "http://localhost:8000/api/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint_url("/students/"),
            "http://localhost:8000/api/students/"
        );
        assert_eq!(
            config.endpoint_url("auth/login/"),
            "http://localhost:8000/api/auth/login/"
        );
    }

    #[test]
    fn validate_rejects_empty_base_url() {
        let config = Config {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config::load_from(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
