//! Game directory discovery.
//!
//! The launcher keeps one directory per release under `<game_dir>/versions`.
//! An explicit directory wins outright; otherwise the standard per-platform
//! locations are searched in a fixed order.

use std::path::{Path, PathBuf};

use log::trace;

use crate::dirs::BaseDirs;
use crate::error::{FetcherError, Result};

/// Directory names searched beneath the platform data directory.
const DATA_DIR_NAMES: [&str; 2] = [".minecraft", "minecraft"];

/// Directory name searched beneath the home directory.
const HOME_DIR_NAME: &str = ".minecraft";

/// Name of the per-release directory container.
pub const VERSIONS_DIR_NAME: &str = "versions";

/// List the standard game directory locations in search order.
///
/// Locations whose base directory is unavailable are skipped, and duplicates
/// are removed.
#[must_use]
pub fn game_dir_candidates(dirs: &dyn BaseDirs) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(data) = dirs.data_dir() {
        candidates.extend(DATA_DIR_NAMES.iter().map(|name| data.join(name)));
    }
    if let Some(home) = dirs.home_dir() {
        candidates.push(home.join(HOME_DIR_NAME));
    }
    candidates.dedup();
    candidates
}

/// Resolve the game directory.
///
/// # Errors
///
/// Returns [`FetcherError::GameDirOverrideMissing`] when `override_dir` is
/// given but is not a directory, and [`FetcherError::GameDirNotFound`] when
/// no standard location exists.
pub fn resolve_game_dir(override_dir: Option<&Path>, dirs: &dyn BaseDirs) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        trace!("using game directory override {}", dir.display());
        if dir.is_dir() {
            return Ok(dir.to_path_buf());
        }
        return Err(FetcherError::GameDirOverrideMissing {
            path: dir.to_path_buf(),
        });
    }

    let candidates = game_dir_candidates(dirs);
    for candidate in &candidates {
        trace!("probing game directory {}", candidate.display());
        if candidate.is_dir() {
            return Ok(candidate.clone());
        }
    }
    Err(FetcherError::GameDirNotFound {
        searched: candidates,
    })
}

/// Return `<game_dir>/versions`, which must exist.
///
/// # Errors
///
/// Returns [`FetcherError::VersionsDirNotFound`] if it is not a directory.
pub fn versions_dir(game_dir: &Path) -> Result<PathBuf> {
    let path = game_dir.join(VERSIONS_DIR_NAME);
    if path.is_dir() {
        Ok(path)
    } else {
        Err(FetcherError::VersionsDirNotFound { path })
    }
}
