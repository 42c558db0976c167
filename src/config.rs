//! TOML-based dashboard configuration.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::controller::{ControllerSettings, DirectorySink, FallbackPolicy};
use crate::gateway::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Top-level configuration parsed from TOML.
///
/// Every section is optional and defaults to the values a local
/// installation uses. Load with [`DashboardConfig::from_toml_file`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Upstream service connection.
    #[serde(default)]
    pub gateway: GatewayConfig,
    /// Auto-refresh and failure handling.
    #[serde(default)]
    pub refresh: RefreshConfig,
    /// Where downloaded CSV exports are saved.
    #[serde(default)]
    pub export: ExportConfig,
    /// Local JSON API.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Upstream service connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    /// Root URL of the service's API.
    pub base_url: String,
    /// Per-request timeout in seconds (must be > 0).
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

/// Auto-refresh and failure handling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RefreshConfig {
    /// Seconds between automatic refreshes (must be > 0).
    pub period_secs: u64,
    /// Start the timer as soon as the dashboard starts.
    pub auto_start: bool,
    /// `"keep_previous"` or `"placeholder"`.
    pub fallback: FallbackPolicy,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            period_secs: 300,
            auto_start: false,
            fallback: FallbackPolicy::default(),
        }
    }
}

/// Where downloaded CSV exports are saved.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Local JSON API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"refresh.period_secs"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DashboardConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let g = &self.gateway;
        if !(g.base_url.starts_with("http://") || g.base_url.starts_with("https://")) {
            errors.push(ConfigError {
                field: "gateway.base_url".into(),
                message: format!("must be an http(s) URL, got \"{}\"", g.base_url),
            });
        }
        if g.timeout_secs == 0 {
            errors.push(ConfigError {
                field: "gateway.timeout_secs".into(),
                message: "must be > 0".into(),
            });
        }

        if self.refresh.period_secs == 0 {
            errors.push(ConfigError {
                field: "refresh.period_secs".into(),
                message: "must be > 0".into(),
            });
        }

        if self.export.directory.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "export.directory".into(),
                message: "must not be empty".into(),
            });
        }

        errors
    }

    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.timeout_secs)
    }

    /// Controller settings derived from the `[refresh]` and `[export]` sections.
    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            fallback: self.refresh.fallback,
            refresh_period: Duration::from_secs(self.refresh.period_secs),
            export_sink: std::sync::Arc::new(DirectorySink::new(&self.export.directory)),
        }
    }
}
