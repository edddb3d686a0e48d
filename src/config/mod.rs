/// Configuration management for the studio site backend
///
/// Handles server configuration and the optional platform bindings (relational
/// store and object store). A binding whose variable is unset stays `None` and
/// the routes that need it answer with a server error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix shared by every variable this service reads
pub const ENV_PREFIX: &str = "STUDIO_";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Relational store binding, absent when `STUDIO_DATABASE_URL` is unset
    pub database: Option<DatabaseConfig>,
    /// Object store binding, absent when `STUDIO_STORAGE_DIR` is unset
    pub storage: Option<StorageConfig>,
    /// Raw `STUDIO_*` variables, exposed to handlers through the platform accessor
    pub env: BTreeMap<String, String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
    /// Deployment name reported by the health check
    pub environment: String,
    /// Request body limit for the upload route, in bytes
    pub max_upload_bytes: usize,
}

/// SQLite connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection URL (e.g., "sqlite://data/studio.db")
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

/// Local object store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding uploaded objects and their metadata sidecars
    pub root_dir: String,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        // A missing .env file is normal outside local development
        dotenvy::dotenv().ok();

        let env: BTreeMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();

        Self::from_env_map(env)
    }
}

impl Config {
    /// Build a configuration from an already collected variable map
    pub fn from_env_map(env: BTreeMap<String, String>) -> Self {
        let var = |name: &str| env.get(name).cloned().filter(|v| !v.is_empty());

        Self {
            server: ServerConfig {
                host: var("STUDIO_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: var("STUDIO_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(3000),
                environment: var("STUDIO_ENV").unwrap_or_else(|| "development".to_string()),
                max_upload_bytes: var("STUDIO_MAX_UPLOAD_BYTES")
                    .and_then(|b| b.parse().ok())
                    .unwrap_or(10 * 1024 * 1024),
            },
            database: var("STUDIO_DATABASE_URL").map(|url| DatabaseConfig {
                url,
                max_connections: var("STUDIO_DATABASE_MAX_CONNECTIONS")
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(5),
            }),
            storage: var("STUDIO_STORAGE_DIR").map(|root_dir| StorageConfig { root_dir }),
            env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_environment_leaves_bindings_unconfigured() {
        let config = Config::from_env_map(BTreeMap::new());

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.environment, "development");
        assert!(config.database.is_none());
        assert!(config.storage.is_none());
    }

    #[test]
    fn bindings_are_read_from_studio_variables() {
        let config = Config::from_env_map(env_map(&[
            ("STUDIO_PORT", "8080"),
            ("STUDIO_DATABASE_URL", "sqlite://site.db"),
            ("STUDIO_DATABASE_MAX_CONNECTIONS", "2"),
            ("STUDIO_STORAGE_DIR", "uploads"),
        ]));

        assert_eq!(config.server.port, 8080);
        let database = config.database.expect("database binding");
        assert_eq!(database.url, "sqlite://site.db");
        assert_eq!(database.max_connections, 2);
        assert_eq!(config.storage.expect("storage binding").root_dir, "uploads");
        assert_eq!(config.env.len(), 4);
    }

    #[test]
    fn unparsable_numbers_fall_back_to_defaults() {
        let config = Config::from_env_map(env_map(&[
            ("STUDIO_PORT", "not-a-port"),
            ("STUDIO_MAX_UPLOAD_BYTES", "lots"),
            ("STUDIO_DATABASE_URL", ""),
        ]));

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.database.is_none());
    }
}
