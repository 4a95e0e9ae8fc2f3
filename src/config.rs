use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::page::DEFAULT_TRIGGER_CLASS;
use crate::sanitize::FragmentPolicy;

/// Points at a config file, overriding the platform config dir lookup.
pub const CONFIG_ENV: &str = "WALLMODAL_CONFIG";

/// Overrides `server_url` from whatever config was loaded.
pub const SERVER_URL_ENV: &str = "WALLMODAL_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the gallery server hosting the fragment endpoint.
    pub server_url: String,
    pub trigger_class: String,
    pub request_timeout_secs: u64,
    pub fragment_policy: FragmentPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_url: "http://127.0.0.1:5000".to_string(),
            trigger_class: DEFAULT_TRIGGER_CLASS.to_string(),
            request_timeout_secs: 30,
            fragment_policy: FragmentPolicy::Clean,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load configuration. Resolution order: explicit path, `$WALLMODAL_CONFIG`,
/// the platform config dir (only if a file exists there), built-in defaults.
/// `$WALLMODAL_SERVER_URL` overrides the server URL in every case.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(existing_default_config_path);

    let mut config = match path {
        Some(path) => read_config_file(&path)?,
        None => Config::default(),
    };

    if let Ok(url) = env::var(SERVER_URL_ENV) {
        if !url.is_empty() {
            config.server_url = url;
        }
    }
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn existing_default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "wallmodal")?;
    let path = dirs.config_dir().join("config.toml");
    if path.exists() {
        Some(path)
    } else {
        None
    }
}
