//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Graph store connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Base URL of the Neo4j HTTP endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    #[serde(default = "default_username")]
    pub username: String,

    /// Name of the environment variable holding the password
    #[serde(default = "default_password_env")]
    pub password_env: String,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:7474".to_string()
}

fn default_database() -> String {
    "neo4j".to_string()
}

fn default_username() -> String {
    "neo4j".to_string()
}

fn default_password_env() -> String {
    "NEO4J_PASSWORD".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            database: default_database(),
            username: default_username(),
            password_env: default_password_env(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub graph: GraphConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            server: ServerConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graph.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Graph timeout must be greater than 0".to_string(),
            ));
        }

        if self.graph.database.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Graph database name must not be empty".to_string(),
            ));
        }

        if let Err(e) = url::Url::parse(&self.graph.base_url) {
            return Err(ConfigError::ValidationError(format!(
                "Graph base_url is not a valid URL: {}",
                e
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, "info");
        assert_eq!(config.graph.database, "neo4j");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_graph_config_default() {
        let graph = GraphConfig::default();

        assert_eq!(graph.base_url, "http://localhost:7474");
        assert_eq!(graph.username, "neo4j");
        assert_eq!(graph.password_env, "NEO4J_PASSWORD");
        assert_eq!(graph.timeout_seconds, 30);
    }

    #[test]
    fn test_config_validation_ok() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_timeout() {
        let mut config = AppConfig::default();
        config.graph.timeout_seconds = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_url() {
        let mut config = AppConfig::default();
        config.graph.base_url = "not a url".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_empty_database() {
        let mut config = AppConfig::default();
        config.graph.database = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_bad_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"\n[graph]\ndatabase = \"tennis\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.graph.database, "tennis");
        assert_eq!(config.graph.base_url, "http://localhost:7474");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig::load_or_default(&tmp.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();

        // Should be parseable
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.graph.base_url, parsed.graph.base_url);
    }
}
