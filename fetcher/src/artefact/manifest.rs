//! Local version manifest resolution.
//!
//! The launcher keeps one JSON document per installed release at
//! `<versions_dir>/<version>/<version>.json`. This module locates that
//! document and parses it into an immutable [`VersionManifest`]. Only JSON
//! syntax is checked here; the fields the fetcher needs are read later by
//! [`crate::artefact::descriptor`].

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use super::version_id::VersionId;

/// Errors arising from manifest resolution.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No manifest exists at the expected location.
    #[error("manifest for version {version} not found at {}", path.display())]
    ManifestMissing {
        /// The requested version.
        version: String,
        /// Where the manifest was expected.
        path: PathBuf,
    },

    /// The manifest exists but is not valid JSON.
    #[error("manifest {} is not valid JSON", path.display())]
    ManifestParseError {
        /// Path to the malformed manifest.
        path: PathBuf,
        /// The underlying parser error.
        #[source]
        source: serde_json::Error,
    },

    /// The manifest exists but could not be read.
    #[error("failed to read manifest {}", path.display())]
    Io {
        /// Path to the unreadable manifest.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// A parsed version manifest.
///
/// The document is immutable once loaded. Descriptor extraction borrows it
/// through [`VersionManifest::document`].
#[derive(Debug, Clone)]
pub struct VersionManifest {
    version: VersionId,
    path: PathBuf,
    document: Value,
}

impl VersionManifest {
    /// Parse a manifest document that has already been read into memory.
    ///
    /// `path` is only used for error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::ManifestParseError`] if `json` is not valid
    /// JSON.
    pub fn from_json(version: VersionId, path: PathBuf, json: &str) -> Result<Self, ManifestError> {
        match serde_json::from_str(json) {
            Ok(document) => Ok(Self {
                version,
                path,
                document,
            }),
            Err(source) => Err(ManifestError::ManifestParseError { path, source }),
        }
    }

    /// The version this manifest describes.
    #[must_use]
    pub fn version(&self) -> &VersionId {
        &self.version
    }

    /// The file the manifest was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed JSON document.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }
}

/// Return the path at which the manifest for `version` is expected.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use mappings_fetcher::artefact::manifest::manifest_path;
/// use mappings_fetcher::artefact::version_id::VersionId;
///
/// let version = VersionId::try_from("1.16.5").expect("valid version");
/// let path = manifest_path(Path::new("/games/versions"), &version);
/// assert_eq!(path, Path::new("/games/versions/1.16.5/1.16.5.json"));
/// ```
#[must_use]
pub fn manifest_path(versions_dir: &Path, version: &VersionId) -> PathBuf {
    versions_dir
        .join(version.as_str())
        .join(version.manifest_file_name())
}

/// Locate and parse the manifest for `version` beneath `versions_dir`.
///
/// # Errors
///
/// Returns [`ManifestError::ManifestMissing`] when the file does not exist,
/// [`ManifestError::ManifestParseError`] when it is not valid JSON, and
/// [`ManifestError::Io`] for any other read failure.
pub fn resolve(versions_dir: &Path, version: &VersionId) -> Result<VersionManifest, ManifestError> {
    let path = manifest_path(versions_dir, version);
    debug!("resolving manifest for {version} at {}", path.display());

    let file = match File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ManifestError::ManifestMissing {
                version: version.to_string(),
                path,
            });
        }
        Err(source) => return Err(ManifestError::Io { path, source }),
    };

    let parsed = serde_json::from_reader::<_, Value>(BufReader::new(file));
    match parsed {
        Ok(document) => Ok(VersionManifest {
            version: version.clone(),
            path,
            document,
        }),
        Err(source) if source.is_io() => Err(ManifestError::Io {
            source: io::Error::other(source),
            path,
        }),
        Err(source) => Err(ManifestError::ManifestParseError { path, source }),
    }
}
