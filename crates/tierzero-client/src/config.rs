//! Client configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file
//! (`tierzero.toml` unless a path is given), then `TIERZERO_*` environment
//! variables, e.g. `TIERZERO_API_KEY`, `TIERZERO_BASE_URL`,
//! `TIERZERO_TIMEOUT_SECS`.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.tierzero.com";
pub const DEFAULT_CONFIG_FILE: &str = "tierzero.toml";
const ENV_PREFIX: &str = "TIERZERO";

#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Organization API key.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout. `None` leaves reqwest's default in place.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::validation(
                "api_key is required; set it in the config file or via TIERZERO_API_KEY",
            ));
        }

        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::validation(format!("base_url is not a valid URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::validation(format!(
                "base_url must use http or https, got {}",
                parsed.scheme()
            )));
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::validation("timeout_secs must be > 0"));
        }

        Ok(())
    }
}

/// Load and validate configuration from the file at `path` (or the default
/// file in the working directory) and the process environment.
pub fn load_config(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    load_config_with_env(path, None)
}

/// Like [`load_config`], but reads environment overrides from `env` instead
/// of the process environment when given.
pub fn load_config_with_env(
    path: Option<&Path>,
    env: Option<HashMap<String, String>>,
) -> Result<ClientConfig, ConfigError> {
    let mut builder = Config::builder();

    let file = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if file.exists() {
        builder = builder.add_source(File::from(file));
    } else if path.is_some() {
        tracing::warn!(path = %file.display(), "Config file not found, using environment only");
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(env),
    );

    let cfg: ClientConfig = builder.build()?.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builder() {
        let cfg = ClientConfig::new("key").with_timeout_secs(30);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(ClientConfig::new("  ").validate().is_err());
        assert!(
            ClientConfig::new("key")
                .with_base_url("not a url")
                .validate()
                .is_err()
        );
        assert!(
            ClientConfig::new("key")
                .with_base_url("ftp://api.tierzero.com")
                .validate()
                .is_err()
        );
        assert!(ClientConfig::new("key").with_timeout_secs(0).validate().is_err());
    }

    #[test]
    fn test_debug_masks_api_key() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }
}
