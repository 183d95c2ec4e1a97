//! Service configuration - environment loading
//!
//! Read once at startup from environment variables (after any `.env` file
//! has been loaded by the caller):
//! - `HTTP_SERVER_ADDRESS`: bind address (default: 127.0.0.1:8081)
//! - `HTTP_SERVER_TIMEOUT`: per-request deadline, `5`, `5s` or `500ms` (default: 5s)
//! - `LOG_LEVEL`: default log filter (default: debug)
//! - `DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_PORT`: data source

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgSslMode};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Data-source locator
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
}

impl DbConfig {
    /// Connection options for the pool. TLS is disabled.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "db".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            name: "postgres".to_string(),
            port: 5432,
        }
    }
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("port", &self.port)
            .finish()
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub bind_addr: SocketAddr,
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8081)),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Everything the service reads at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub http: HttpConfig,
    pub db: DbConfig,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            db: DbConfig::default(),
            log_level: "debug".to_string(),
        }
    }
}

impl Settings {
    /// Create settings from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create settings from an arbitrary variable source (for testing)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("HTTP_SERVER_ADDRESS") {
            Some(value) => parse_addr("HTTP_SERVER_ADDRESS", &value)?,
            None => defaults.http.bind_addr,
        };
        let request_timeout = match get("HTTP_SERVER_TIMEOUT") {
            Some(value) => parse_duration("HTTP_SERVER_TIMEOUT", &value)?,
            None => defaults.http.request_timeout,
        };
        let port = match get("DB_PORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|err| {
                ConfigError::Invalid {
                    var: "DB_PORT",
                    value,
                    reason: err.to_string(),
                }
            })?,
            None => defaults.db.port,
        };

        Ok(Self {
            http: HttpConfig {
                bind_addr,
                request_timeout,
            },
            db: DbConfig {
                host: get("DB_HOST").unwrap_or(defaults.db.host),
                user: get("DB_USER").unwrap_or(defaults.db.user),
                password: get("DB_PASSWORD").unwrap_or(defaults.db.password),
                name: get("DB_NAME").unwrap_or(defaults.db.name),
                port,
            },
            log_level: get("LOG_LEVEL")
                .map(|l| l.to_lowercase())
                .unwrap_or(defaults.log_level),
        })
    }
}

/// Accepts `host:port`, resolving names like `localhost`.
fn parse_addr(var: &'static str, value: &str) -> Result<SocketAddr, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    };

    if let Ok(addr) = value.parse() {
        return Ok(addr);
    }

    value
        .to_socket_addrs()
        .map_err(|err| invalid(err.to_string()))?
        .next()
        .ok_or_else(|| invalid("resolved to no address".to_string()))
}

/// Accepts bare seconds (`5`), seconds (`5s`) or milliseconds (`500ms`).
fn parse_duration(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let value = value.trim();
    let invalid = || ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: "expected seconds like 5, 5s or 500ms".to_string(),
    };

    let (digits, to_duration): (&str, fn(u64) -> Duration) =
        if let Some(ms) = value.strip_suffix("ms") {
            (ms, Duration::from_millis)
        } else if let Some(s) = value.strip_suffix('s') {
            (s, Duration::from_secs)
        } else {
            (value, Duration::from_secs)
        };

    digits.parse().map(to_duration).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_when_nothing_set() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.http.bind_addr.port(), 8081);
        assert_eq!(s.http.request_timeout, Duration::from_secs(5));
        assert_eq!(s.db.host, "db");
        assert_eq!(s.db.port, 5432);
        assert_eq!(s.log_level, "debug");
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("HTTP_SERVER_ADDRESS", "0.0.0.0:9000"),
            ("HTTP_SERVER_TIMEOUT", "750ms"),
            ("LOG_LEVEL", "INFO"),
            ("DB_HOST", "pg.internal"),
            ("DB_USER", "quotes"),
            ("DB_PASSWORD", "hunter2"),
            ("DB_NAME", "quotes_db"),
            ("DB_PORT", "6543"),
        ])
        .unwrap();

        assert_eq!(s.http.bind_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(s.http.request_timeout, Duration::from_millis(750));
        assert_eq!(s.log_level, "info");
        assert_eq!(
            s.db,
            DbConfig {
                host: "pg.internal".into(),
                user: "quotes".into(),
                password: "hunter2".into(),
                name: "quotes_db".into(),
                port: 6543,
            }
        );
    }

    #[test]
    fn timeout_forms() {
        for (raw, expected) in [
            ("5", Duration::from_secs(5)),
            ("5s", Duration::from_secs(5)),
            ("250ms", Duration::from_millis(250)),
        ] {
            assert_eq!(parse_duration("T", raw).unwrap(), expected, "{raw}");
        }
        assert!(parse_duration("T", "five").is_err());
        assert!(parse_duration("T", "5m").is_err());
    }

    #[test]
    fn bad_port_is_reported() {
        let err = settings(&[("DB_PORT", "postgres")]).unwrap_err();
        assert!(err.to_string().contains("DB_PORT"));
    }

    #[test]
    fn localhost_address_resolves() {
        let s = settings(&[("HTTP_SERVER_ADDRESS", "localhost:8081")]).unwrap();
        assert_eq!(s.http.bind_addr.port(), 8081);
        assert!(s.http.bind_addr.ip().is_loopback());
    }

    #[test]
    fn debug_output_hides_password() {
        let db = DbConfig {
            password: "hunter2".into(),
            ..DbConfig::default()
        };
        let out = format!("{db:?}");
        assert!(!out.contains("hunter2"));
        assert!(out.contains("<redacted>"));
    }
}
