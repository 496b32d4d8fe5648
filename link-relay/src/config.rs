//! Configuration loading for link-relay.
//!
//! Configuration is loaded from a TOML file (default: `skylink.toml`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for link-relay.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Overlay endpoint configuration.
    pub server: ServerConfig,
    /// Relay loop configuration.
    pub relay: RelayConfig,
    /// HTTP endpoints configuration.
    pub http: HttpConfig,
}

/// Overlay endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the iroh endpoint socket (default: 0.0.0.0:4433).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

/// Relay loop configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    /// Read buffer size per connection in bytes (default: 32 KiB).
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,
    /// Relay channel capacity in envelopes (default: 1, minimum: 1).
    ///
    /// Capacity 1 is the unbuffered-equivalent: the consumer must be
    /// ready for a publish to land, otherwise the envelope is dropped.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// HTTP endpoints configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Bind address for the HTTP control surface (default: 0.0.0.0:4444).
    #[serde(default = "default_http_bind")]
    pub bind_address: String,
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0:4433".to_string()
}

fn default_read_buffer_size() -> usize {
    32 * 1024
}

fn default_channel_capacity() -> usize {
    1
}

fn default_http_bind() -> String {
    "0.0.0.0:4444".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: default_bind_address(),
            },
            relay: RelayConfig {
                read_buffer_size: default_read_buffer_size(),
                channel_capacity: default_channel_capacity(),
            },
            http: HttpConfig {
                bind_address: default_http_bind(),
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

/// The visor-supplied environment this relay was launched with.
///
/// Exposed verbatim over `GET /api/v1/env` for introspection. Values
/// not present in the environment come through as empty strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvInfo {
    /// Public key of the local visor.
    pub visor_pk: String,
    /// Address of the app server the relay registered with.
    pub app_server_addr: String,
    /// Application key assigned by the visor.
    pub app_key: String,
}

impl EnvInfo {
    /// Capture the relevant environment variables at startup.
    pub fn from_env() -> Self {
        Self {
            visor_pk: std::env::var("VISOR_PK").unwrap_or_default(),
            app_server_addr: std::env::var("APP_SERVER_ADDR").unwrap_or_default(),
            app_key: std::env::var("APP_KEY").unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:4433");
        assert_eq!(config.relay.read_buffer_size, 32 * 1024);
        assert_eq!(config.relay.channel_capacity, 1);
        assert_eq!(config.http.bind_address, "0.0.0.0:4444");
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[server]
bind_address = "127.0.0.1:5000"

[relay]
read_buffer_size = 65536
channel_capacity = 4

[http]
bind_address = "0.0.0.0:9090"
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.bind_address, "127.0.0.1:5000");
        assert_eq!(config.relay.read_buffer_size, 65536);
        assert_eq!(config.relay.channel_capacity, 4);
        assert_eq!(config.http.bind_address, "0.0.0.0:9090");
    }

    #[test]
    fn config_missing_fields_use_defaults() {
        let toml = r#"
[server]
[relay]
[http]
"#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.relay.read_buffer_size, 32 * 1024);
        assert_eq!(config.http.bind_address, "0.0.0.0:4444");
    }

    #[test]
    fn env_info_serializes_with_snake_case_fields() {
        let env = EnvInfo {
            visor_pk: "02abc".to_string(),
            app_server_addr: "localhost:5505".to_string(),
            app_key: "key".to_string(),
        };

        let json = serde_json::to_string(&env).unwrap();
        assert!(json.contains("\"visor_pk\":\"02abc\""));
        assert!(json.contains("\"app_server_addr\":\"localhost:5505\""));
        assert!(json.contains("\"app_key\":\"key\""));
    }
}
