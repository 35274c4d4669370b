//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `infopanel.toml` in the working directory unless another path is
//! given on the command line. Every field has a default so the file is
//! optional. Environment variables take precedence over file values. When no
//! HSL key is configured anywhere, `secrets.txt` next to the binary's working
//! directory supplies it.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use infopanel_adapter_upstream::UpstreamConfig;

/// File read when no HSL key is configured.
pub const SECRETS_FILE: &str = "secrets.txt";

/// Top-level configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    /// Collector endpoints, key, stops and poll intervals.
    pub upstream: UpstreamConfig,
    pub dashboard: DashboardConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Dashboard refresh and tuning settings.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Seconds between two snapshot fetches, also used as the page reload.
    pub refresh_secs: u64,
    /// Expose the font tuning sliders.
    pub tuning_controls: bool,
    /// Read snapshots from another instance instead of the local collectors.
    pub status_url: Option<String>,
}

impl Config {
    /// Load configuration from `path` (if present), apply environment
    /// overrides, then fall back to [`SECRETS_FILE`] for the HSL key.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed, or if
    /// the resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        if !config.upstream.has_hsl_key() {
            config.apply_secrets_file(Path::new(SECRETS_FILE))?;
        }
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("INFOPANEL_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("INFOPANEL_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("INFOPANEL_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("INFOPANEL_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("INFOPANEL_HSL_KEY") {
            self.upstream.hsl_api_key = val;
        }
    }

    /// Read the HSL key from `path`, trimmed. A missing file is not an error.
    fn apply_secrets_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                content.trim().clone_into(&mut self.upstream.hsl_api_key);
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.dashboard.refresh_secs == 0 {
            return Err(ConfigError::Validation(
                "dashboard.refresh_secs must be non-zero".to_string(),
            ));
        }
        let upstream = &self.upstream;
        for (name, secs) in [
            ("transport_interval_secs", upstream.transport_interval_secs),
            ("weather_interval_secs", upstream.weather_interval_secs),
            ("electricity_interval_secs", upstream.electricity_interval_secs),
            ("request_timeout_secs", upstream.request_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::Validation(format!(
                    "upstream.{name} must be non-zero"
                )));
            }
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard.refresh_secs)
    }

    /// The effective configuration as JSON with the HSL key masked.
    #[must_use]
    pub fn debug_json(&self) -> serde_json::Value {
        serde_json::json!({
            "server": self.server,
            "logging": self.logging,
            "upstream": self.upstream.masked(),
            "dashboard": self.dashboard,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "infopaneld=info,infopanel=info,tower_http=info".to_string(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_secs: 60,
            tuning_controls: false,
            status_url: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}
