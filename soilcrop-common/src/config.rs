//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! Command-line and environment values arrive together through
//! [`ConfigOverrides`] (clap reads both); this module merges them over the
//! TOML file and the compiled defaults.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Reference dataset the soil-type vocabulary is derived from
pub const DEFAULT_DATASET_URL: &str =
    "https://raw.githubusercontent.com/AbhishekSenguptaGit/Crop-Recommendation/refs/heads/master/cropdata.csv";

/// Base URL of the scoring service (`/predict` is appended)
pub const DEFAULT_SCORER_URL: &str = "http://127.0.0.1:5000";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5730;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Contents of `config.toml`
///
/// Every key is optional. Missing keys fall back to compiled defaults when
/// the file is merged into a [`ServiceConfig`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Delimited dataset holding the `Soil Type` column
    #[serde(default)]
    pub dataset_url: Option<String>,

    /// Scoring service base URL
    #[serde(default)]
    pub scorer_url: Option<String>,

    /// HTTP bind host
    #[serde(default)]
    pub host: Option<String>,

    /// HTTP bind port
    #[serde(default)]
    pub port: Option<u16>,

    /// Timeout applied to each outbound request
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Set by [`TomlConfig::load`], never read from the file
    #[serde(skip)]
    pub source: ConfigSource,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load the config file
    ///
    /// An explicit path must exist and parse. Without one, the platform
    /// default locations are tried; if none exists the compiled defaults are
    /// used. A missing config never stops startup. Nothing is logged here:
    /// the result records its [`ConfigSource`] so the caller can report it
    /// once logging is up.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
            })?;
            let mut config = Self::from_toml_str(&content)?;
            config.source = ConfigSource::File(path.to_path_buf());
            return Ok(config);
        }

        match default_config_path() {
            Some(path) => {
                let content = std::fs::read_to_string(&path)?;
                let mut config = Self::from_toml_str(&content)?;
                config.source = ConfigSource::File(path);
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Where the file-tier settings came from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// No config file was found
    #[default]
    CompiledDefaults,
    /// Settings read from this file
    File(PathBuf),
}

impl ConfigSource {
    /// Report the source; a missing file is a warning
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::CompiledDefaults => {
                warn!("No config file found, using compiled defaults")
            }
        }
    }
}

/// Find the first existing config file in the platform default locations
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("soilcrop").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/soilcrop/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub dataset_url: Option<String>,
    pub scorer_url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub dataset_url: String,
    pub scorer_url: String,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub log_level: String,
    pub source: ConfigSource,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::merge(ConfigOverrides::default(), TomlConfig::default())
    }
}

impl ServiceConfig {
    /// Load the TOML file named by the overrides (or the default locations)
    /// and merge everything into a validated config
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let file = TomlConfig::load(overrides.config_path.as_deref())?;
        let config = Self::merge(overrides, file);
        config.validate()?;
        Ok(config)
    }

    /// Merge overrides over file values over compiled defaults
    pub fn merge(overrides: ConfigOverrides, file: TomlConfig) -> Self {
        Self {
            dataset_url: overrides
                .dataset_url
                .or(file.dataset_url)
                .unwrap_or_else(|| DEFAULT_DATASET_URL.to_string()),
            scorer_url: overrides
                .scorer_url
                .or(file.scorer_url)
                .unwrap_or_else(|| DEFAULT_SCORER_URL.to_string()),
            host: overrides
                .host
                .or(file.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.port).unwrap_or(DEFAULT_PORT),
            request_timeout: Duration::from_secs(
                file.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            log_level: file.logging.level,
            source: file.source,
        }
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [("dataset_url", &self.dataset_url), ("scorer_url", &self.scorer_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(Error::Config(
                "request_timeout_secs must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Full URL of the scoring endpoint
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.scorer_url.trim_end_matches('/'))
    }
}
