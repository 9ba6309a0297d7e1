//! Configuration management
//!
//! Settings are resolved with this precedence: command-line flag (or its
//! environment variable) > user config file > built-in default.

use directories::ProjectDirs;
use miette::Diagnostic;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid API URL '{url}': {reason}")]
    #[diagnostic(
        code(stockpile::config::api_url),
        help("use an absolute http(s) URL such as http://localhost:8000/api")
    )]
    InvalidUrl { url: String, reason: String },

    #[error("cannot read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {}: {}", .path.display(), .message)]
    #[diagnostic(code(stockpile::config::parse))]
    Parse { path: PathBuf, message: String },
}

/// On-disk config file; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_url: Option<String>,
    color: Option<bool>,
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub config_path: Option<PathBuf>,
    pub no_color: bool,
}

/// Resolved settings handed to every command
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub color: bool,
    /// The file the settings were read from, if any
    pub source: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from overrides, the config file and defaults
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        // A named file must exist; only the per-user default may be absent
        let path = match &overrides.config_path {
            Some(path) => Some(path.clone()),
            None => Self::default_path().filter(|path| path.exists()),
        };
        let file = match &path {
            Some(path) => Self::read_file(path)?,
            None => ConfigFile::default(),
        };
        let source = path;

        let raw_url = overrides
            .api_url
            .clone()
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            api_url: parse_api_url(&raw_url)?,
            color: !overrides.no_color && file.color.unwrap_or(true),
            source,
        })
    }

    /// `<config dir>/stockpile/config.yaml` for the current platform
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "stockpile").map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }
        serde_yml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}
