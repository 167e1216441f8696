//! Unified path management for confsync configuration files.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolution for confsync.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/confsync/          # Config directory (platform default via `dirs`)
/// └── config.toml              # Application configuration
/// ```
///
/// OAuth credentials and tokens live wherever `config.toml` or the CLI
/// flags point; by default next to the mapping file in the working
/// directory.
pub struct ConfSyncPaths;

impl ConfSyncPaths {
    const APP_DIR: &'static str = "confsync";

    /// Returns the confsync configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/confsync/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
