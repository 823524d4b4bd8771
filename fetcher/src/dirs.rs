//! Directory resolution abstraction for platform-specific paths.
//!
//! The fetcher needs the user's home, data, and configuration directories to
//! find the game installation and its own configuration file. [`BaseDirs`]
//! hides the platform lookup so discovery can be tested with a mock.

use std::path::PathBuf;

/// Name of the fetcher's directory beneath the platform config directory.
pub const APP_DIR_NAME: &str = "mappings-fetcher";

/// Platform base directories used during discovery.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// The roaming application-data directory (`%APPDATA%` on Windows,
    /// `~/Library/Application Support` on macOS, `~/.local/share` on Linux).
    fn data_dir(&self) -> Option<PathBuf>;

    /// The user configuration directory.
    fn config_dir(&self) -> Option<PathBuf>;
}

/// The fetcher's own configuration directory.
#[must_use]
pub fn fetcher_config_dir(dirs: &dyn BaseDirs) -> Option<PathBuf> {
    dirs.config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn data_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.data_dir().to_path_buf())
    }

    fn config_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
    }
}
