//! Static process configuration.
//!
//! Loaded once at startup from a JSON file and passed to each component at
//! construction time. There is no hot-reload; requests never mutate config.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Default location of the config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

fn default_port() -> u16 {
    3000
}

fn default_tokens() -> HashMap<String, Vec<String>> {
    let mut tokens = HashMap::new();
    tokens.insert(
        "demo-token".to_string(),
        vec![
            "read".to_string(),
            "create".to_string(),
            "update".to_string(),
        ],
    );
    tokens
}

fn default_events_file() -> PathBuf {
    PathBuf::from("events.json")
}

fn default_backup_enabled() -> bool {
    true
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("backups")
}

/// Server configuration, deserialized from camelCase JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    /// Static bearer tokens mapped to their permission lists.
    #[serde(default = "default_tokens")]
    pub tokens: HashMap<String, Vec<String>>,

    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,

    #[serde(default = "default_backup_enabled")]
    pub backup_enabled: bool,

    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: default_port(),
            tokens: default_tokens(),
            events_file: default_events_file(),
            backup_enabled: default_backup_enabled(),
            backup_dir: default_backup_dir(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, falling back to the built-in default
    /// on any failure. A missing or malformed config file is logged but
    /// never fatal; the caller always gets a usable `Config`.
    pub fn load(path: &Path) -> Config {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) => {
                warn!(
                    "could not read config {}: {err}; using defaults",
                    path.display()
                );
                return Config::default();
            }
        };

        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(err) => {
                warn!(
                    "could not parse config {}: {err}; using defaults",
                    path.display()
                );
                Config::default()
            }
        }
    }
}
