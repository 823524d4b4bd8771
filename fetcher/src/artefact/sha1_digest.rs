//! SHA-1 digest newtype for mapping verification.
//!
//! Validates that the value is a 40-character lowercase hexadecimal string
//! representing a 160-bit hash digest. The digest is a content checksum
//! published in the version manifest, not a security boundary.

use super::error::{ArtefactError, Result};
use std::fmt;

/// Expected length of a hex-encoded SHA-1 digest.
pub const DIGEST_HEX_LEN: usize = 40;

/// A validated hex-encoded SHA-1 digest string.
///
/// # Examples
///
/// ```
/// use mappings_fetcher::artefact::sha1_digest::Sha1Digest;
///
/// let digest: Sha1Digest = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"
///     .try_into()
///     .expect("valid digest");
/// assert_eq!(digest.as_str().len(), 40);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha1Digest(String);

impl Sha1Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Compare two digests, ignoring ASCII case.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Encode raw digest bytes as lowercase hex.
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        let hex = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(hex)
    }
}

impl TryFrom<&str> for Sha1Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha1(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha1Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        validate_sha1(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for Sha1Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha1Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-1 digest.
fn validate_sha1(value: &str) -> Result<()> {
    if value.len() != DIGEST_HEX_LEN {
        return Err(ArtefactError::InvalidSha1Digest {
            reason: format!(
                "expected {DIGEST_HEX_LEN} hex characters, got {}",
                value.len()
            ),
        });
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ArtefactError::InvalidSha1Digest {
            reason: format!("non-hex character '{bad}'"),
        });
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ArtefactError::InvalidSha1Digest {
            reason: "digest must be lowercase".to_owned(),
        });
    }
    Ok(())
}
