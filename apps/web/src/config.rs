//! Web app configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::session::DEFAULT_IDLE_TIMEOUT;

/// Web app configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listen address (`BISTRO_BIND_ADDR`, default `127.0.0.1:8080`)
    pub bind_addr: SocketAddr,

    /// SQLite file (`BISTRO_DB_PATH`, default `<data dir>/bistro.db`)
    pub db_path: PathBuf,

    /// Pool size (`BISTRO_DB_MAX_CONNECTIONS`, default 5)
    pub db_max_connections: u32,

    /// Idle time before a session is forgotten (`BISTRO_SESSION_IDLE_SECS`,
    /// default 1440)
    pub session_idle_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BISTRO_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("BISTRO_BIND_ADDR".to_string()))?;

        let db_path = match lookup("BISTRO_DB_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_db_path()?,
        };

        let db_max_connections = lookup("BISTRO_DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .ok()
            .filter(|n: &u32| *n > 0)
            .ok_or_else(|| ConfigError::InvalidValue("BISTRO_DB_MAX_CONNECTIONS".to_string()))?;

        let session_idle_timeout = match lookup("BISTRO_SESSION_IDLE_SECS") {
            Some(secs) => secs
                .trim()
                .parse()
                .ok()
                .filter(|n: &u64| *n > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| ConfigError::InvalidValue("BISTRO_SESSION_IDLE_SECS".to_string()))?,
            None => DEFAULT_IDLE_TIMEOUT,
        };

        Ok(AppConfig {
            bind_addr,
            db_path,
            db_max_connections,
            session_idle_timeout,
        })
    }
}

/// Platform data directory, e.g. `~/.local/share/bistro/bistro.db` on Linux.
fn default_db_path() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("com", "bistro", "bistro").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().join("bistro.db"))
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not determine a data directory; set BISTRO_DB_PATH")]
    NoDataDir,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::load_from(lookup(&[
            ("BISTRO_BIND_ADDR", "0.0.0.0:9000"),
            ("BISTRO_DB_PATH", "/tmp/bistro-test.db"),
            ("BISTRO_DB_MAX_CONNECTIONS", "8"),
            ("BISTRO_SESSION_IDLE_SECS", "600"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.db_path, PathBuf::from("/tmp/bistro-test.db"));
        assert_eq!(config.db_max_connections, 8);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(600));
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_from(lookup(&[("BISTRO_DB_PATH", "bistro.db")])).unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.session_idle_timeout, Duration::from_secs(1440));
    }

    #[test]
    fn test_invalid_values() {
        let err = AppConfig::load_from(lookup(&[
            ("BISTRO_BIND_ADDR", "not-an-addr"),
            ("BISTRO_DB_PATH", "bistro.db"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "BISTRO_BIND_ADDR"));

        let err = AppConfig::load_from(lookup(&[
            ("BISTRO_DB_PATH", "bistro.db"),
            ("BISTRO_DB_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "BISTRO_DB_MAX_CONNECTIONS"));

        let err = AppConfig::load_from(lookup(&[
            ("BISTRO_DB_PATH", "bistro.db"),
            ("BISTRO_SESSION_IDLE_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "BISTRO_SESSION_IDLE_SECS"));
    }
}
