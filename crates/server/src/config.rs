// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration.
//!
//! Values resolve in order: environment variables, then the TOML config
//! file, then platform defaults. `SCRIBE_CONFIG` points at an alternate
//! config file; `SCRIBE_STATE_DIR`, `SCRIBE_SOCKET` and `SCRIBE_TCP`
//! override individual fields.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no home directory; set SCRIBE_STATE_DIR explicitly")]
    NoStateDir,
}

/// On-disk config file shape. Every field is optional; missing fields
/// fall back to platform defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    state_dir: Option<PathBuf>,
    socket: Option<PathBuf>,
    /// TCP listen address, e.g. "0.0.0.0:4710". Off unless set.
    tcp: Option<String>,
}

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Where the WAL and lock file live.
    pub state_dir: PathBuf,
    /// Unix socket the daemon listens on.
    pub socket: PathBuf,
    /// Optional TCP listen address for off-host printers.
    pub tcp: Option<String>,
}

impl ServerConfig {
    /// Load configuration from the default locations.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match config_path() {
            Some(path) if path.exists() => read_config_file(&path)?,
            _ => ConfigFile::default(),
        };
        Self::resolve(file)
    }

    /// Load configuration from an explicit config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::resolve(read_config_file(path)?)
    }

    fn resolve(file: ConfigFile) -> Result<Self, ConfigError> {
        let state_dir = match std::env::var_os("SCRIBE_STATE_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => match file.state_dir {
                Some(dir) => dir,
                None => default_state_dir()?,
            },
        };

        let socket = match std::env::var_os("SCRIBE_SOCKET") {
            Some(path) => PathBuf::from(path),
            None => file.socket.unwrap_or_else(|| state_dir.join("scribed.sock")),
        };

        let tcp = std::env::var("SCRIBE_TCP").ok().filter(|s| !s.is_empty()).or(file.tcp);

        Ok(Self { state_dir, socket, tcp })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

/// Config file: SCRIBE_CONFIG > ~/.config/scribe/config.toml
fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("SCRIBE_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("scribe/config.toml"))
}

/// State directory: XDG state dir under a `scribe` namespace.
fn default_state_dir() -> Result<PathBuf, ConfigError> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join("scribe"))
        .ok_or(ConfigError::NoStateDir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
