//! Configuration lookup for the CLI.
//!
//! The CLI reads the same TOML file as the server. Without `--config` it
//! falls back to `<config dir>/algoverse/config.toml`, then to defaults.

use crate::error::Result;
use algoverse_server::config::ServerConfig;
use std::path::{Path, PathBuf};

/// Default configuration file location, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("algoverse").join("config.toml"))
}

/// Pick the file to load: the explicit path, else the default one if it
/// exists.
pub fn resolve_path(explicit: Option<&Path>, default: Option<PathBuf>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => default.filter(|path| path.is_file()),
    }
}

/// Load configuration from `explicit` or the default location.
///
/// An explicit path that cannot be read is an error; a missing default file
/// is not.
pub fn load(explicit: Option<&Path>) -> Result<ServerConfig> {
    match resolve_path(explicit, default_path()) {
        Some(path) => Ok(ServerConfig::from_file(path)?),
        None => Ok(ServerConfig::default()),
    }
}
