//! Version identifier newtype.
//!
//! Release identifiers are free-form (`1.14.4`, `20w14a`, `1.14 Pre-Release 5`)
//! so validation only rejects values that cannot name a single directory
//! entry beneath the versions directory.

use super::error::{ArtefactError, Result};
use std::fmt;

/// A validated game version identifier (e.g. `1.16.5`).
///
/// # Examples
///
/// ```
/// use mappings_fetcher::artefact::version_id::VersionId;
///
/// let version: VersionId = "1.16.5".try_into().expect("valid version");
/// assert_eq!(version.manifest_file_name(), "1.16.5.json");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionId(String);

impl VersionId {
    /// Return the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the file name of this version's manifest document.
    #[must_use]
    pub fn manifest_file_name(&self) -> String {
        format!("{}.json", self.0)
    }
}

fn invalid(value: &str, reason: &str) -> ArtefactError {
    ArtefactError::InvalidVersion {
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}

impl TryFrom<&str> for VersionId {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(invalid(value, "version must not be empty"));
        }
        if value == "." || value == ".." {
            return Err(invalid(value, "version must not be a relative path component"));
        }
        if value.contains(['/', '\\']) {
            return Err(invalid(value, "version must not contain path separators"));
        }
        if value.chars().any(char::is_control) {
            return Err(invalid(value, "version must not contain control characters"));
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for VersionId {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for VersionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
