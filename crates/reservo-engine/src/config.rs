//! Engine configuration.
//!
//! Passed explicitly to whatever builds the engine; nothing here is global.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, ReservoError};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
pub const DEFAULT_ENTITY_ID: &str = "1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Base URL of the reservation backend, e.g. `http://localhost:3001`.
    pub backend_url: String,
    /// Entity queried when a caller does not name one.
    pub default_entity_id: String,
    /// Per-request timeout against the backend.
    pub timeout_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            default_entity_id: DEFAULT_ENTITY_ID.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl EngineConfig {
    /// Read a TOML file. Missing keys fall back to their defaults.
    ///
    /// # Errors
    /// Returns `ReservoError::Config` if the file cannot be read, is not valid
    /// TOML, contains unknown keys, or fails [`EngineConfig::validate`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReservoError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(contents).map_err(|e| ReservoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(ReservoError::Config(
                "backend_url must not be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ReservoError::Config(format!(
                "backend_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.default_entity_id.trim().is_empty() {
            return Err(ReservoError::Config(
                "default_entity_id must not be empty".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(ReservoError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The backend URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.backend_url.trim().trim_end_matches('/')
    }
}
