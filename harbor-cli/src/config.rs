use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use harbor_core::StoreConfig;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "harbor.toml";
pub const DEFAULT_DATABASE: &str = "safe-harbor.db";

const DEFAULT_RELAY_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from `harbor.toml`.
///
/// ```toml
/// rules_dir = "rules/2026"
///
/// [store]
/// backend = "sqlite"
/// connection_string = "safe-harbor.db"
///
/// [relay]
/// bind = "127.0.0.1:3000"
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub store: StoreConfig,
    /// Directory holding `rules.toml` and `brackets.csv`. The built-in 2026
    /// rules are used when unset.
    pub rules_dir: Option<PathBuf>,
    pub relay: RelaySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig {
                backend: "sqlite".to_string(),
                connection_string: DEFAULT_DATABASE.to_string(),
            },
            rules_dir: None,
            relay: RelaySettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelaySettings {
    pub bind: SocketAddr,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_RELAY_PORT)),
        }
    }
}

impl AppConfig {
    pub fn parse(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads `path`, or returns the defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text, path)?;
        debug!(path = %path.display(), backend = %config.store.backend, "Loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(text: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::parse(text, Path::new("harbor.toml"))
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(parse("").unwrap(), AppConfig::default());
    }

    #[test]
    fn defaults_use_local_sqlite_file() {
        let config = AppConfig::default();

        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.connection_string, "safe-harbor.db");
        assert_eq!(config.relay.bind.to_string(), "127.0.0.1:3000");
        assert_eq!(config.rules_dir, None);
    }

    #[test]
    fn full_file() {
        let config = parse(
            r#"
            rules_dir = "rules/2026"

            [store]
            backend = "memory"

            [relay]
            bind = "0.0.0.0:8080"
            "#,
        )
        .unwrap();

        assert_eq!(config.rules_dir, Some(PathBuf::from("rules/2026")));
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.store.connection_string, "");
        assert_eq!(config.relay.bind.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = parse("colour = \"blue\"").unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("harbor.toml"));
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        assert!(parse("[relay]\nbind = \"localhost\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("safe-harbor-no-such-config.toml");

        assert_eq!(AppConfig::load_or_default(&path).unwrap(), AppConfig::default());
    }
}
