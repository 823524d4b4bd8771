//! Integrity verification for downloaded mapping files.
//!
//! Streams a file through SHA-1 and compares the result against the digest
//! published in the version manifest. Equal digests are the only outcome
//! reported as [`Verification::Valid`].

use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};

use super::sha1_digest::Sha1Digest;

/// Read buffer size used while hashing.
const CHUNK_SIZE: usize = 8192;

/// The outcome of comparing a file's digest against an expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// The computed digest equals the expected digest.
    Valid {
        /// The digest of the file content.
        digest: Sha1Digest,
    },
    /// The computed digest differs from the expected digest.
    Mismatch {
        /// The digest the manifest promised.
        expected: Sha1Digest,
        /// The digest of the file content.
        actual: Sha1Digest,
    },
}

impl Verification {
    /// Return true for [`Verification::Valid`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Hashing failed because the file could not be read.
#[derive(Debug, thiserror::Error)]
#[error("failed to hash {}", path.display())]
pub struct VerifyError {
    /// The file that could not be hashed.
    pub path: PathBuf,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// Compute the SHA-1 digest of everything `reader` yields.
///
/// # Errors
///
/// Propagates any read error other than [`io::ErrorKind::Interrupted`].
pub fn sha1_reader(reader: &mut dyn Read) -> io::Result<Sha1Digest> {
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(buffer.get(..bytes_read).unwrap_or_default());
    }
    Ok(Sha1Digest::from_bytes(&hasher.finalize()))
}

/// Compute the SHA-1 digest of the file at `path`.
///
/// # Errors
///
/// Returns [`VerifyError`] if the file cannot be opened or read.
pub fn compute_sha1(path: &Path) -> Result<Sha1Digest, VerifyError> {
    let to_error = |source: io::Error| VerifyError {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::open(path).map_err(to_error)?;
    sha1_reader(&mut file).map_err(to_error)
}

/// Hash the file at `path` and compare it with `expected`.
///
/// The comparison ignores ASCII case.
///
/// # Errors
///
/// Returns [`VerifyError`] if the file cannot be read. A digest difference
/// is not an error; it is reported as [`Verification::Mismatch`].
///
/// # Examples
///
/// ```
/// use mappings_fetcher::artefact::sha1_digest::Sha1Digest;
/// use mappings_fetcher::artefact::verification::verify;
///
/// let dir = tempfile::tempdir().expect("temp dir");
/// let path = dir.path().join("client.txt");
/// std::fs::write(&path, b"hello").expect("write file");
///
/// let expected = Sha1Digest::try_from("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
///     .expect("valid digest");
/// assert!(verify(&path, &expected).expect("readable").is_valid());
/// ```
pub fn verify(path: &Path, expected: &Sha1Digest) -> Result<Verification, VerifyError> {
    let actual = compute_sha1(path)?;
    if actual.matches(expected) {
        Ok(Verification::Valid { digest: actual })
    } else {
        Ok(Verification::Mismatch {
            expected: expected.clone(),
            actual,
        })
    }
}
