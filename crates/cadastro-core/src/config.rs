//! Configuration management for cadastro.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SECS_PER_HOUR: u64 = 60 * 60;

/// Main application configuration.
///
/// This is loaded from `~/.config/cadastro/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address lookup settings
    pub lookup: LookupConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `CADASTRO_LOOKUP_TIMEOUT_SECS`: per-request timeout
    /// - `CADASTRO_LOOKUP_MAX_ATTEMPTS`: attempts per provider
    /// - `CADASTRO_CACHE_TTL_HOURS`: cache time-to-live
    /// - `CADASTRO_CONNECTIVITY_URL`: connectivity probe endpoint
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable source.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secs) = var("CADASTRO_LOOKUP_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.lookup.request_timeout_secs = secs;
            tracing::debug!("Override lookup.request_timeout_secs from env: {}", secs);
        }

        if let Some(attempts) = var("CADASTRO_LOOKUP_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
            self.lookup.max_attempts = attempts;
            tracing::debug!("Override lookup.max_attempts from env: {}", attempts);
        }

        if let Some(hours) = var("CADASTRO_CACHE_TTL_HOURS").and_then(|v| v.parse().ok()) {
            self.lookup.cache_ttl_hours = hours;
            tracing::debug!("Override lookup.cache_ttl_hours from env: {}", hours);
        }

        if let Some(url) = var("CADASTRO_CONNECTIVITY_URL") {
            tracing::debug!("Override lookup.connectivity_url from env: {}", url);
            self.lookup.connectivity_url = url;
        }
    }

    /// Check value constraints that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.lookup.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.lookup.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lookup.request_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.lookup.cache_ttl_hours.checked_mul(SECS_PER_HOUR).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "lookup.cache_ttl_hours".to_string(),
                reason: "too large to express in seconds".to_string(),
            });
        }

        if self.lookup.providers.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "lookup.providers".to_string(),
                reason: "at least one provider is required".to_string(),
            });
        }

        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/cadastro/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("com", "cadastro", "cadastro").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Address lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Attempts per provider, including the first one
    pub max_attempts: u32,
    /// Base retry delay in milliseconds, multiplied by the attempt number
    pub retry_delay_ms: u64,
    /// Hours a cached address stays fresh
    pub cache_ttl_hours: u64,
    /// Endpoint used by the connectivity probe
    pub connectivity_url: String,
    /// Connectivity probe timeout in seconds
    pub connectivity_timeout_secs: u64,
    /// Provider names in priority order: `viacep`, `brasilapi`, `apicep`
    pub providers: Vec<String>,
}

impl LookupConfig {
    /// Per-request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Base retry delay as a `Duration`.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Cache time-to-live as a `Duration`.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_hours.saturating_mul(SECS_PER_HOUR))
    }

    /// Connectivity probe timeout as a `Duration`.
    #[must_use]
    pub fn connectivity_timeout(&self) -> Duration {
        Duration::from_secs(self.connectivity_timeout_secs)
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 10,
            max_attempts: 3,
            retry_delay_ms: 1000,
            cache_ttl_hours: 24,
            connectivity_url: "https://httpbin.org/get".to_string(),
            connectivity_timeout_secs: 5,
            providers: vec![
                "viacep".to_string(),
                "brasilapi".to_string(),
                "apicep".to_string(),
            ],
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,cadastro=debug".to_string(),
        }
    }
}
