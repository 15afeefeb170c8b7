//! Digest configuration.
//!
//! Loaded from `--config <path>`, or `~/.ddl-digest/config.toml` when no path
//! is given. Every field is optional; a missing default file means defaults.
//!
//! ```toml
//! store = "site/tasks.json"
//! calendar = "calendars/fall-2025.toml"
//!
//! [digest]
//! from = "ddl-bot@example.com"
//! to = "me@illinois.edu"
//! dashboard-url = "https://me.github.io/assignment-ddl-digest"
//!
//! [delivery]
//! command = ["sendmail", "-t"]
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Errors loading the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Digest configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Path of the persisted task store the dashboard reads.
    pub store: PathBuf,
    /// Calendar file. The compiled-in term is used when unset.
    pub calendar: Option<PathBuf>,
    pub digest: DigestConfig,
    pub delivery: DeliveryConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DigestConfig {
    pub from: Option<String>,
    pub to: Option<String>,
    pub dashboard_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct DeliveryConfig {
    /// Command that receives the MIME message on stdin, e.g. `["sendmail", "-t"]`.
    /// The digest is printed to stdout when unset.
    pub command: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: PathBuf::from("tasks.json"),
            calendar: None,
            digest: DigestConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }
}

impl Config {
    /// Load config from `explicit`, or from the default location.
    ///
    /// An explicit path must exist. The default path may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The default config file path: `~/.ddl-digest/config.toml`.
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".ddl-digest").join("config.toml"))
    }
}
