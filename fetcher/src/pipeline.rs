//! Mapping fetch-and-verify orchestrator.
//!
//! Sequences the pipeline for one version:
//!
//! ```text
//! Start → ManifestResolved → DescriptorsExtracted → ClientDownloaded
//!       → ServerDownloaded → ClientVerified → ServerVerified → Done
//! ```
//!
//! Any failing step ends the run with a [`FetchError`] naming the step and,
//! where relevant, the artifact. Nothing is retried and files already
//! written are left on disk for inspection.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::artefact::descriptor::{ArtifactKind, DescriptorError, MappingDescriptors, extract};
use crate::artefact::download::{
    ArtifactDownloader, DownloadError, DownloadedArtifact, HttpDownloader, HttpTimeouts,
};
use crate::artefact::manifest::{ManifestError, resolve};
use crate::artefact::sha1_digest::Sha1Digest;
use crate::artefact::verification::{Verification, VerifyError, verify};
use crate::artefact::version_id::VersionId;
use crate::output::write_stderr_line;

/// Inputs for one pipeline run.
#[derive(Debug)]
pub struct FetchConfig<'a> {
    /// The release whose mappings are fetched.
    pub version: &'a VersionId,
    /// Directory holding `<version>/<version>.json`.
    pub versions_dir: &'a Path,
    /// Root under which `<version>/client.txt` and `<version>/server.txt`
    /// are written.
    pub output_root: &'a Path,
    /// When true, suppress progress output.
    pub quiet: bool,
}

/// Positions in the linear pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing has happened yet.
    Start,
    /// The manifest was found and parsed.
    ManifestResolved,
    /// Both descriptors were read from the manifest.
    DescriptorsExtracted,
    /// The client mappings were written to disk.
    ClientDownloaded,
    /// The server mappings were written to disk.
    ServerDownloaded,
    /// The client mappings hashed to the expected digest.
    ClientVerified,
    /// The server mappings hashed to the expected digest.
    ServerVerified,
    /// Every step succeeded.
    Done,
}

impl PipelineState {
    const fn downloaded(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Client => Self::ClientDownloaded,
            ArtifactKind::Server => Self::ServerDownloaded,
        }
    }

    const fn verified(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Client => Self::ClientVerified,
            ArtifactKind::Server => Self::ServerVerified,
        }
    }
}

/// The pipeline step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Locating and parsing the version manifest.
    ResolveManifest,
    /// Reading the mapping descriptors out of the manifest.
    ExtractDescriptors,
    /// Creating the output directory.
    PrepareOutput,
    /// Downloading one artifact.
    Download(ArtifactKind),
    /// Hashing and comparing one artifact.
    Verify(ArtifactKind),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolveManifest => write!(f, "manifest resolution"),
            Self::ExtractDescriptors => write!(f, "descriptor extraction"),
            Self::PrepareOutput => write!(f, "output preparation"),
            Self::Download(kind) => write!(f, "{kind} mappings download"),
            Self::Verify(kind) => write!(f, "{kind} mappings verification"),
        }
    }
}

/// Errors that end a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The manifest is missing, malformed, or unreadable.
    #[error("manifest resolution failed")]
    Manifest(#[from] ManifestError),

    /// A descriptor field is missing or invalid.
    #[error("descriptor extraction failed")]
    Descriptor(#[from] DescriptorError),

    /// The output directory could not be created.
    #[error("could not create output directory {}", path.display())]
    OutputDirectory {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be downloaded.
    #[error("{artifact} mappings download failed")]
    Download {
        /// Which artifact failed.
        artifact: ArtifactKind,
        /// The underlying download error.
        #[source]
        source: DownloadError,
    },

    /// A downloaded artifact could not be read for hashing.
    #[error("{artifact} mappings could not be hashed")]
    Verify {
        /// Which artifact failed.
        artifact: ArtifactKind,
        /// The underlying I/O failure.
        #[source]
        source: VerifyError,
    },

    /// A downloaded artifact does not match the manifest digest.
    #[error("{artifact} mappings are not valid: expected SHA-1 {expected}, got {actual}")]
    DigestMismatch {
        /// Which artifact failed.
        artifact: ArtifactKind,
        /// The digest the manifest promised.
        expected: Sha1Digest,
        /// The digest of the downloaded file.
        actual: Sha1Digest,
    },
}

impl FetchError {
    /// The step at which the pipeline stopped.
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Self::Manifest(_) => Step::ResolveManifest,
            Self::Descriptor(_) => Step::ExtractDescriptors,
            Self::OutputDirectory { .. } => Step::PrepareOutput,
            Self::Download { artifact, .. } => Step::Download(*artifact),
            Self::Verify { artifact, .. } | Self::DigestMismatch { artifact, .. } => {
                Step::Verify(*artifact)
            }
        }
    }

    /// The artifact involved in the failure, if any.
    #[must_use]
    pub fn artifact(&self) -> Option<ArtifactKind> {
        match self.step() {
            Step::Download(kind) | Step::Verify(kind) => Some(kind),
            Step::ResolveManifest | Step::ExtractDescriptors | Step::PrepareOutput => None,
        }
    }
}

/// What a run intends to do, resolved before any download starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchPlan {
    /// The manifest the descriptors were read from.
    pub manifest_path: PathBuf,
    /// The client and server descriptors.
    pub descriptors: MappingDescriptors,
    /// `<output_root>/<version>`.
    pub output_dir: PathBuf,
}

impl FetchPlan {
    fn new(config: &FetchConfig<'_>, manifest_path: &Path, descriptors: MappingDescriptors) -> Self {
        Self {
            manifest_path: manifest_path.to_path_buf(),
            descriptors,
            output_dir: config.output_root.join(config.version.as_str()),
        }
    }

    /// Where the artifact of `kind` is written.
    #[must_use]
    pub fn destination(&self, kind: ArtifactKind) -> PathBuf {
        self.output_dir.join(kind.file_name())
    }
}

/// One downloaded and verified artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    /// Which artifact this is.
    pub kind: ArtifactKind,
    /// Where it was saved.
    pub path: PathBuf,
    /// Its size in bytes.
    pub bytes_written: u64,
    /// Its verified SHA-1 digest.
    pub digest: Sha1Digest,
}

/// The result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// The manifest the descriptors were read from.
    pub manifest_path: PathBuf,
    /// The client mappings.
    pub client: FetchedArtifact,
    /// The server mappings.
    pub server: FetchedArtifact,
}

/// Operator-facing progress reporting for one run.
struct Progress<'w> {
    state: PipelineState,
    quiet: bool,
    stderr: &'w mut dyn Write,
}

impl<'w> Progress<'w> {
    fn new(quiet: bool, stderr: &'w mut dyn Write) -> Self {
        Self {
            state: PipelineState::Start,
            quiet,
            stderr,
        }
    }

    fn line(&mut self, message: impl fmt::Display) {
        if !self.quiet {
            write_stderr_line(self.stderr, message);
        }
    }

    fn advance(&mut self, next: PipelineState, message: impl fmt::Display) {
        debug!("pipeline {:?} -> {next:?}", self.state);
        self.state = next;
        self.line(message);
    }
}

/// Resolve the manifest and descriptors without downloading anything.
///
/// # Errors
///
/// Returns [`FetchError::Manifest`] or [`FetchError::Descriptor`].
pub fn plan(config: &FetchConfig<'_>) -> Result<FetchPlan, FetchError> {
    let manifest = resolve(config.versions_dir, config.version)?;
    let descriptors = extract(&manifest)?;
    Ok(FetchPlan::new(config, manifest.path(), descriptors))
}

/// Fetch and verify both mapping files using the production HTTP
/// downloader.
///
/// # Errors
///
/// Returns the first [`FetchError`] encountered.
pub fn fetch_mappings(
    config: &FetchConfig<'_>,
    timeouts: HttpTimeouts,
    stderr: &mut dyn Write,
) -> Result<FetchReport, FetchError> {
    fetch_mappings_with(config, &HttpDownloader::new(timeouts), stderr)
}

/// Testable inner function with an injected downloader.
///
/// The production entry point [`fetch_mappings`] delegates here with the
/// real HTTP implementation; tests inject stubs.
///
/// # Errors
///
/// Returns the first [`FetchError`] encountered.
pub fn fetch_mappings_with(
    config: &FetchConfig<'_>,
    downloader: &dyn ArtifactDownloader,
    stderr: &mut dyn Write,
) -> Result<FetchReport, FetchError> {
    let mut progress = Progress::new(config.quiet, stderr);
    progress.line(format!("Getting official mappings for {}.", config.version));

    let manifest = resolve(config.versions_dir, config.version)?;
    progress.advance(
        PipelineState::ManifestResolved,
        format!("Found manifest {}", manifest.path().display()),
    );

    let descriptors = extract(&manifest)?;
    progress.advance(
        PipelineState::DescriptorsExtracted,
        "Read client and server mapping descriptors",
    );

    let plan = FetchPlan::new(config, manifest.path(), descriptors);
    std::fs::create_dir_all(&plan.output_dir).map_err(|source| FetchError::OutputDirectory {
        path: plan.output_dir.clone(),
        source,
    })?;

    let client = download_artifact(&plan, ArtifactKind::Client, downloader, &mut progress)?;
    let server = download_artifact(&plan, ArtifactKind::Server, downloader, &mut progress)?;

    progress.line("Validating mappings.");
    let client = verify_artifact(&plan, ArtifactKind::Client, client, &mut progress)?;
    let server = verify_artifact(&plan, ArtifactKind::Server, server, &mut progress)?;

    progress.advance(PipelineState::Done, "All mappings validated.");
    Ok(FetchReport {
        manifest_path: plan.manifest_path,
        client,
        server,
    })
}

fn download_artifact(
    plan: &FetchPlan,
    kind: ArtifactKind,
    downloader: &dyn ArtifactDownloader,
    progress: &mut Progress<'_>,
) -> Result<DownloadedArtifact, FetchError> {
    let descriptor = plan.descriptors.get(kind);
    let dest = plan.destination(kind);

    progress.line(format!("Downloading {kind} mappings..."));
    let downloaded = downloader
        .download(descriptor.url(), &dest)
        .map_err(|source| FetchError::Download {
            artifact: kind,
            source,
        })?;
    progress.advance(
        PipelineState::downloaded(kind),
        format!(
            "Downloaded {kind} mappings as {} ({} bytes)",
            kind.file_name(),
            downloaded.bytes_written
        ),
    );
    Ok(downloaded)
}

fn verify_artifact(
    plan: &FetchPlan,
    kind: ArtifactKind,
    downloaded: DownloadedArtifact,
    progress: &mut Progress<'_>,
) -> Result<FetchedArtifact, FetchError> {
    let expected = plan.descriptors.get(kind).expected_digest();

    progress.line(format!("Validating {kind} mappings"));
    let outcome =
        verify(&downloaded.path, expected).map_err(|source| FetchError::Verify {
            artifact: kind,
            source,
        })?;

    match outcome {
        Verification::Valid { digest } => {
            progress.advance(
                PipelineState::verified(kind),
                format!("{} mappings validated", capitalise(kind)),
            );
            Ok(FetchedArtifact {
                kind,
                path: downloaded.path,
                bytes_written: downloaded.bytes_written,
                digest,
            })
        }
        Verification::Mismatch { expected, actual } => Err(FetchError::DigestMismatch {
            artifact: kind,
            expected,
            actual,
        }),
    }
}

fn capitalise(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Client => "Client",
        ArtifactKind::Server => "Server",
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
