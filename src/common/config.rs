//! Configuration for the minipatient server

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "minipatient.toml";

/// Prefix for environment overrides, e.g. `MINIPATIENT__BIND_ADDR=127.0.0.1:9000`.
pub const ENV_PREFIX: &str = "MINIPATIENT";

/// Reserved for the health endpoint; cannot be used as a patient prefix.
const HEALTH_PATH: &str = "/health";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bind address for the HTTP API
    pub bind_addr: SocketAddr,

    /// Path prefixes the patient routes are mounted under.
    /// Every prefix serves the same store.
    pub route_prefixes: Vec<String>,

    /// Logging level, used when `RUST_LOG` is unset
    pub log_level: String,

    /// Maximum accepted request body
    pub max_body_bytes: usize,

    /// Per-request timeout
    pub request_timeout_secs: u64,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
fn default_route_prefixes() -> Vec<String> {
    vec!["/patients".to_string()]
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            route_prefixes: default_route_prefixes(),
            log_level: default_log_level(),
            max_body_bytes: default_max_body_bytes(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, an optional TOML file and
    /// `MINIPATIENT__*` environment variables (highest priority).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, ENV_PREFIX)
    }

    pub(crate) fn load_with_env(path: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::InvalidConfig(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                builder = builder.add_source(::config::File::from(p.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(::config::File::from(default_path));
                }
            }
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("route_prefixes"),
        );

        let merged: Config = builder.build()?.try_deserialize()?;
        merged.validate()?;
        Ok(merged)
    }

    /// Check invariants the router relies on.
    pub fn validate(&self) -> Result<()> {
        if self.route_prefixes.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one route prefix is required".into(),
            ));
        }

        let mut seen = HashSet::new();
        for prefix in &self.route_prefixes {
            validate_prefix(prefix)?;
            if !seen.insert(prefix.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate route prefix: {}",
                    prefix
                )));
            }
        }

        if self.max_body_bytes == 0 {
            return Err(Error::InvalidConfig("max_body_bytes must be > 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig(
                "request_timeout_secs must be > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn validate_prefix(prefix: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err::<(), _>(Error::InvalidConfig(format!(
            "invalid route prefix {:?}: {}",
            prefix, reason
        )))
    };

    if !prefix.starts_with('/') || prefix.len() < 2 {
        return invalid("must start with '/' and name a path");
    }
    if prefix.ends_with('/') {
        return invalid("must not end with '/'");
    }
    if prefix.contains(':') || prefix.contains('*') || prefix.contains("//") {
        return invalid("must be a literal path");
    }
    if prefix == HEALTH_PATH {
        return invalid("reserved for the health endpoint");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.route_prefixes, vec!["/patients"]);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn test_rejects_bad_prefixes() {
        for bad in ["patients", "/", "/patients/", "/p/:id", "/p/*rest", "/health", "/a//b"] {
            let config = Config {
                route_prefixes: vec![bad.to_string()],
                ..Default::default()
            };
            assert!(config.validate().is_err(), "prefix {bad:?} should be rejected");
        }
    }

    #[test]
    fn test_rejects_duplicate_and_empty_prefixes() {
        let dup = Config {
            route_prefixes: vec!["/patients".into(), "/patients".into()],
            ..Default::default()
        };
        assert!(dup.validate().is_err());

        let empty = Config {
            route_prefixes: vec![],
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_limits() {
        let config = Config {
            max_body_bytes: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = toml_file();
        writeln!(
            file,
            r#"
bind_addr = "127.0.0.1:9090"
route_prefixes = ["/patients", "/patients-dup"]
request_timeout_secs = 5
"#
        )
        .unwrap();

        let config =
            Config::load_with_env(Some(file.path()), "MINIPATIENT_TEST_FILE_ONLY").unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.route_prefixes, vec!["/patients", "/patients-dup"]);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        // Untouched fields keep their defaults
        assert_eq!(config.log_level, "info");
        assert_eq!(config.max_body_bytes, 1024 * 1024);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = toml_file();
        writeln!(file, r#"log_level = "warn""#).unwrap();

        std::env::set_var("MINIPATIENT_TEST_ENV__LOG_LEVEL", "debug");
        std::env::set_var("MINIPATIENT_TEST_ENV__ROUTE_PREFIXES", "/a,/b");
        let config = Config::load_with_env(Some(file.path()), "MINIPATIENT_TEST_ENV").unwrap();
        std::env::remove_var("MINIPATIENT_TEST_ENV__LOG_LEVEL");
        std::env::remove_var("MINIPATIENT_TEST_ENV__ROUTE_PREFIXES");

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.route_prefixes, vec!["/a", "/b"]);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load_with_env(Some(&missing), "MINIPATIENT_TEST_MISSING"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let mut file = toml_file();
        writeln!(file, r#"route_prefixes = ["no-slash"]"#).unwrap();
        assert!(Config::load_with_env(Some(file.path()), "MINIPATIENT_TEST_INVALID").is_err());
    }
}
