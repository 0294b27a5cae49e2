//! Server configuration.
//!
//! Values are layered, later sources winning: built-in defaults, an optional
//! TOML file, the `PORT` and `CORS_ORIGIN` environment variables, then
//! command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Configuration for the HTTP game server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind to.
    #[serde(default = "default_port")]
    port: u16,

    /// Seed for the AI tie-break RNG. Random when absent.
    #[serde(default)]
    ai_seed: Option<u64>,

    /// Origin allowed to call the API from a browser; `*` allows any.
    #[serde(default = "default_cors_origin")]
    cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(default_host(), default_port(), None, default_cors_origin())
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies a `PORT` value taken from the environment.
    #[instrument(skip(self))]
    pub fn with_port_env(mut self, port: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(raw) = port {
            self.port = raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT value {:?}: {}", raw, e)))?;
            debug!(port = self.port, "Port taken from environment");
        }
        Ok(self)
    }

    /// Applies a `CORS_ORIGIN` value taken from the environment.
    pub fn with_cors_env(mut self, origin: Option<&str>) -> Self {
        if let Some(origin) = origin.map(str::trim).filter(|o| !o.is_empty()) {
            self.cors_origin = origin.to_string();
            debug!(cors_origin = %self.cors_origin, "CORS origin taken from environment");
        }
        self
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        ai_seed: Option<u64>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if ai_seed.is_some() {
            self.ai_seed = ai_seed;
        }
        self
    }

    /// Resolves the full configuration from every source.
    #[instrument(skip_all)]
    pub fn load(
        path: Option<&Path>,
        host: Option<String>,
        port: Option<u16>,
        ai_seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let env_port = std::env::var("PORT").ok();
        let env_cors = std::env::var("CORS_ORIGIN").ok();
        let config = base
            .with_port_env(env_port.as_deref())?
            .with_cors_env(env_cors.as_deref())
            .with_overrides(host, port, ai_seed);
        info!(?config, "Configuration resolved");
        Ok(config)
    }

    /// Address string suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 3000);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.cors_origin(), "*");
    }

    #[test]
    fn test_cors_env() {
        let config = ServerConfig::default().with_cors_env(Some("http://localhost:5173"));
        assert_eq!(config.cors_origin(), "http://localhost:5173");

        let config = ServerConfig::default().with_cors_env(Some("  "));
        assert_eq!(config.cors_origin(), "*");
    }

    #[test]
    fn test_env_port() {
        let config = ServerConfig::default().with_port_env(Some("8080")).unwrap();
        assert_eq!(*config.port(), 8080);

        let err = ServerConfig::default().with_port_env(Some("eighty")).unwrap_err();
        assert!(err.message.contains("Invalid PORT"));
    }

    #[test]
    fn test_overrides_win() {
        let config = ServerConfig::default()
            .with_port_env(Some("8080"))
            .unwrap()
            .with_overrides(Some("0.0.0.0".to_string()), Some(9000), Some(42));
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
        assert_eq!(*config.ai_seed(), Some(42));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ServerConfig = toml::from_str("port = 4000").unwrap();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(*config.port(), 4000);
        assert_eq!(*config.ai_seed(), None);
        assert_eq!(config.cors_origin(), "*");
    }
}
