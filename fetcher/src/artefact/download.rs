//! Mapping file download.
//!
//! Provides a trait-based abstraction for streaming a remote artifact to a
//! local file, enabling dependency injection for testing. The production
//! implementation uses a blocking `ureq` agent with connect and
//! whole-request timeouts.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;

/// Default whole-request timeout for artifact downloads.
///
/// The limit covers connecting and reading the entire body, and client
/// mappings run to several megabytes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);
/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A file written by an [`ArtifactDownloader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    /// Where the artifact was written.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes_written: u64,
}

/// Trait for downloading a remote artifact to a local path.
///
/// Implementations must create missing parent directories and truncate an
/// existing destination rather than appending to or skipping it.
///
/// # Examples
///
/// ```
/// use mappings_fetcher::artefact::download::HttpDownloader;
///
/// let downloader = HttpDownloader::default();
/// // Use downloader.download(url, dest) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtifactDownloader {
    /// Stream `url` into `dest`, returning what was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server answers with a
    /// non-success status, or the file cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<DownloadedArtifact, DownloadError>;
}

/// Errors arising from artifact download operations.
///
/// Every variant carries the URL being fetched.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The request failed or the server answered with an error status.
    #[error("download failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered 404.
    #[error("artifact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// Writing the downloaded bytes failed.
    #[error("failed to write {url} to {}", path.display())]
    Write {
        /// The URL being downloaded.
        url: String,
        /// The destination that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl DownloadError {
    /// The URL whose download failed.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Http { url, .. } | Self::NotFound { url } | Self::Write { url, .. } => url,
        }
    }
}

/// Timeouts applied to every request made by [`HttpDownloader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    /// Upper bound for the whole request, body included.
    pub global: Duration,
    /// Upper bound for establishing the TCP connection.
    pub connect: Duration,
}

impl Default for HttpTimeouts {
    fn default() -> Self {
        Self {
            global: DEFAULT_TIMEOUT,
            connect: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// HTTP-based downloader using `ureq`.
pub struct HttpDownloader {
    agent: ureq::Agent,
}

impl HttpDownloader {
    /// Build a downloader whose agent applies `timeouts`.
    #[must_use]
    pub fn new(timeouts: HttpTimeouts) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeouts.global))
            .timeout_connect(Some(timeouts.connect))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl Default for HttpDownloader {
    fn default() -> Self {
        Self::new(HttpTimeouts::default())
    }
}

impl ArtifactDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<DownloadedArtifact, DownloadError> {
        debug!("GET {url} -> {}", dest.display());
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut reader = response.into_body().into_reader();
        write_stream(url, &mut reader, dest)
    }
}

/// Copy `reader` into `dest`, creating parent directories and truncating
/// any existing file.
///
/// Read failures are reported as [`DownloadError::Http`] (the stream is the
/// network body); write failures as [`DownloadError::Write`].
///
/// # Errors
///
/// Returns an error if the destination cannot be created or written, or if
/// reading from `reader` fails.
pub fn write_stream(
    url: &str,
    reader: &mut dyn io::Read,
    dest: &Path,
) -> Result<DownloadedArtifact, DownloadError> {
    let write_error = |source: io::Error| DownloadError::Write {
        url: url.to_owned(),
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }
    let mut file = File::create(dest).map_err(write_error)?;

    let mut buffer = [0u8; 8192];
    let mut bytes_written: u64 = 0;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(DownloadError::Http {
                    url: url.to_owned(),
                    reason: e.to_string(),
                });
            }
        };
        let chunk = buffer.get(..read).unwrap_or_default();
        file.write_all(chunk).map_err(write_error)?;
        bytes_written += read as u64;
    }
    file.flush().map_err(write_error)?;

    Ok(DownloadedArtifact {
        path: dest.to_path_buf(),
        bytes_written,
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::StatusCode(status) => DownloadError::Http {
            url: url.to_owned(),
            reason: format!("server returned HTTP {status}"),
        },
        other => DownloadError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
