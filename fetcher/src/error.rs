//! Error types for the mappings fetcher CLI.
//!
//! This module defines the top-level error returned by a run and maps each
//! failure category to a distinct process exit code. Discovery errors carry
//! recovery hints where applicable.

use std::path::PathBuf;

use thiserror::Error;

use crate::artefact::error::ArtefactError;
use crate::artefact::manifest::ManifestError;
use crate::config::ConfigError;
use crate::pipeline::FetchError;

/// Exit code for a successful run.
pub const EXIT_SUCCESS: i32 = 0;

/// Errors that can end a fetcher run.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// No game directory was found in any of the standard locations.
    #[error(
        "could not find the game directory (searched: {}); pass it with --minecraft <DIR>",
        display_paths(searched)
    )]
    GameDirNotFound {
        /// Every candidate that was searched.
        searched: Vec<PathBuf>,
    },

    /// An explicitly supplied game directory does not exist.
    #[error("game directory {} does not exist", path.display())]
    GameDirOverrideMissing {
        /// The directory that was supplied.
        path: PathBuf,
    },

    /// The game directory has no `versions` directory.
    #[error("versions directory not found at {}", path.display())]
    VersionsDirNotFound {
        /// Where the directory was expected.
        path: PathBuf,
    },

    /// The version argument is unusable.
    #[error(transparent)]
    InvalidVersion(#[from] ArtefactError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The fetch pipeline failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The current directory could not be determined.
    #[error("could not determine the current directory")]
    CurrentDir {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

impl FetcherError {
    /// The process exit code for this failure.
    ///
    /// Codes are grouped by stage: `1` generic I/O, `3`-`5` setup,
    /// `10`-`13` manifest and output preparation, `20`-`22` per-artifact
    /// download and verification. Clap reports usage errors with `2`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CurrentDir { .. } | Self::WriteFailed { .. } => 1,
            Self::GameDirNotFound { .. }
            | Self::GameDirOverrideMissing { .. }
            | Self::VersionsDirNotFound { .. } => 3,
            Self::Config(_) => 4,
            Self::InvalidVersion(_) => 5,
            Self::Fetch(err) => fetch_exit_code(err),
        }
    }
}

fn fetch_exit_code(err: &FetchError) -> i32 {
    match err {
        FetchError::Manifest(ManifestError::ManifestMissing { .. }) => 10,
        FetchError::Manifest(_) => 11,
        FetchError::Descriptor(_) => 12,
        FetchError::OutputDirectory { .. } => 13,
        FetchError::Download { .. } => 20,
        FetchError::Verify { .. } => 21,
        FetchError::DigestMismatch { .. } => 22,
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "no candidate locations available".to_owned();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias using [`FetcherError`].
pub type Result<T> = std::result::Result<T, FetcherError>;
