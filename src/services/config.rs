use crate::domain::constants::DEFAULT_ACCEPT;
use crate::error::HstsError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub accept: String,
    pub request_gzip: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            accept: DEFAULT_ACCEPT.to_string(),
            request_gzip: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub backup: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { backup: true }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config/update-wget-hsts/config.toml"))
}

/// Loads `explicit` if given (must exist), else the default file if present.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ConfigFile> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) if p.exists() => p,
            _ => return Ok(ConfigFile::default()),
        },
    };
    let raw = std::fs::read_to_string(&path).map_err(|e| config_error(&path, e))?;
    let config: ConfigFile = toml::from_str(&raw).map_err(|e| config_error(&path, e))?;
    tracing::debug!(path = %path.display(), ?config, "loaded configuration");
    Ok(config)
}

fn config_error(path: &Path, message: impl ToString) -> HstsError {
    HstsError::Config {
        path: path.display().to_string(),
        message: message.to_string(),
    }
}
