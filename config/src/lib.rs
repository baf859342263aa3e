//! Configuration loading for Emporium.
//!
//! `~/.emporium/config.toml` is read into raw `Option`-heavy structs, then
//! resolved against environment overrides and defaults into
//! [`EmporiumConfig`]. A missing file is not an error.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 3001
//!
//! [store]
//! database_path = "${HOME}/.emporium/stores.db"
//! ```

use std::{env, fs, io};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BIND: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding `server.bind`.
pub const BIND_ENV: &str = "EMPORIUM_BIND";
/// Environment variable overriding `store.database_path`.
pub const DB_ENV: &str = "EMPORIUM_DB";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid bind address {0:?}")]
    InvalidBind(String),
    #[error("invalid port {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    server: Option<RawServer>,
    store: Option<RawStore>,
}

#[derive(Debug, Default, Deserialize)]
struct RawServer {
    bind: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStore {
    database_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind: IpAddr,
    pub port: u16,
}

impl ServerSettings {
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub database_path: PathBuf,
}

/// Fully resolved configuration. Every field has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmporiumConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
}

impl EmporiumConfig {
    /// Load from the default path. Read or parse failures are logged and
    /// replaced by defaults; invalid overrides are still reported.
    pub fn load() -> Result<Self, ConfigError> {
        let raw = match config_path() {
            Some(path) if path.exists() => match read_raw(&path) {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::warn!("{err}; using defaults");
                    RawConfig::default()
                }
            },
            _ => RawConfig::default(),
        };
        Self::resolve(raw, |key| env::var(key).ok())
    }

    /// Load from an explicit path. Unlike [`EmporiumConfig::load`], a
    /// missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let raw = read_raw(path)?;
        Self::resolve(raw, |key| env::var(key).ok())
    }

    /// Parse TOML text with no environment overrides.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::resolve(raw, |_| None)
    }

    fn resolve(
        raw: RawConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw_server = raw.server.unwrap_or_default();
        let raw_store = raw.store.unwrap_or_default();

        let bind: IpAddr = match lookup(BIND_ENV).or(raw_server.bind) {
            Some(value) => {
                let value = expand_env_vars(&value, &lookup);
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidBind(value))?
            }
            None => DEFAULT_BIND,
        };

        let port: u16 = match lookup(PORT_ENV) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value))?,
            None => raw_server.port.unwrap_or(DEFAULT_PORT),
        };

        let database_path = lookup(DB_ENV)
            .or(raw_store.database_path)
            .map(|value| PathBuf::from(expand_env_vars(&value, &lookup)))
            .unwrap_or_else(default_database_path);

        Ok(Self {
            server: ServerSettings { bind, port },
            store: StoreSettings { database_path },
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

impl Default for EmporiumConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind: DEFAULT_BIND,
                port: DEFAULT_PORT,
            },
            store: StoreSettings {
                database_path: default_database_path(),
            },
        }
    }
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `~/.emporium`, falling back to `./.emporium` without a home directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::home_dir().map_or_else(|| PathBuf::from(".emporium"), |home| home.join(".emporium"))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".emporium").join("config.toml"))
}

/// Log file for one-shot commands: `<data dir>/logs/emporium.log`.
#[must_use]
pub fn log_path() -> PathBuf {
    data_dir().join("logs").join("emporium.log")
}

fn default_database_path() -> PathBuf {
    data_dir().join("stores.db")
}

/// Replace `${VAR}` occurrences using `lookup`. Unknown variables expand to
/// the empty string; an unterminated `${` is kept verbatim.
pub fn expand_env_vars(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&lookup(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::net::{IpAddr, Ipv4Addr};
    use std::path::PathBuf;

    use super::{
        ConfigError, DEFAULT_PORT, EmporiumConfig, RawConfig, data_dir, expand_env_vars, log_path,
    };

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn raw(toml_text: &str) -> RawConfig {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let config = EmporiumConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.bind, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(config.store.database_path.ends_with("stores.db"));
    }

    #[test]
    fn file_values_are_used() {
        let config = EmporiumConfig::from_toml_str(
            "[server]\nbind = \"0.0.0.0\"\nport = 8080\n[store]\ndatabase_path = \"/tmp/s.db\"\n",
        )
        .unwrap();
        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.store.database_path, PathBuf::from("/tmp/s.db"));
    }

    #[test]
    fn env_overrides_file() {
        let config = EmporiumConfig::resolve(
            raw("[server]\nport = 8080\n[store]\ndatabase_path = \"/tmp/a.db\"\n"),
            env_of(&[("PORT", "9000"), ("EMPORIUM_DB", "/tmp/b.db")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.database_path, PathBuf::from("/tmp/b.db"));
    }

    #[test]
    fn database_path_expands_variables() {
        let config = EmporiumConfig::resolve(
            raw("[store]\ndatabase_path = \"${DATA}/stores.db\"\n"),
            env_of(&[("DATA", "/srv/emporium")]),
        )
        .unwrap();
        assert_eq!(
            config.store.database_path,
            PathBuf::from("/srv/emporium/stores.db")
        );
    }

    #[test]
    fn bad_port_override_is_reported() {
        let err = EmporiumConfig::resolve(RawConfig::default(), env_of(&[("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(value) if value == "http"));
    }

    #[test]
    fn bad_bind_is_reported() {
        let err = EmporiumConfig::from_toml_str("[server]\nbind = \"nowhere\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind(_)));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = EmporiumConfig::from_toml_str("[server\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4321\n").unwrap();
        // PORT may be set in the test environment; only assert what the file controls.
        let config = EmporiumConfig::load_from(&path).unwrap();
        if std::env::var("PORT").is_err() {
            assert_eq!(config.server.port, 4321);
        }
    }

    #[test]
    fn load_from_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = EmporiumConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn expand_env_vars_cases() {
        let lookup = env_of(&[("A", "x")]);
        assert_eq!(expand_env_vars("${A}/${B}/c", &lookup), "x//c");
        assert_eq!(expand_env_vars("plain", &lookup), "plain");
        assert_eq!(expand_env_vars("open ${A", &lookup), "open ${A");
        assert_eq!(expand_env_vars("${}", &lookup), "");
    }

    #[test]
    fn log_file_lives_under_data_dir() {
        let path = log_path();
        assert!(path.starts_with(data_dir()));
        assert!(path.ends_with("logs/emporium.log"));
    }
}
