use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AppConfig;

/// Environment variable that overrides `server.base_url`
pub const SERVER_ENV: &str = "TODOEY_SERVER";

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Per-user directory holding config.toml and state.json
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("todoey")
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load config from `path`. A missing file yields the defaults; an
/// unreadable or malformed one is an error.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Apply the server override: explicit flag first, then the environment.
pub fn apply_server_override(config: &mut AppConfig, flag: Option<&str>, env: Option<&str>) {
    if let Some(url) = flag.or(env).map(str::trim).filter(|s| !s.is_empty()) {
        config.server.base_url = url.to_string();
    }
}
