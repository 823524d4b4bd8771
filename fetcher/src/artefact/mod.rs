//! Version manifest, mapping descriptors, download, and verification.
//!
//! This module implements the domain model for fetching a release's mapping
//! files, leaf to root:
//!
//! - [`error`] - Semantic error types for validation failures.
//! - [`version_id`] - Version identifier newtype (`VersionId`).
//! - [`sha1_digest`] - SHA-1 digest newtype (`Sha1Digest`).
//! - [`manifest`] - Local manifest resolution (`resolve`, `VersionManifest`).
//! - [`descriptor`] - Client/server descriptor extraction (`extract`).
//! - [`download`] - Artifact download trait and HTTP implementation.
//! - [`verification`] - Streaming SHA-1 computation and comparison.

pub mod descriptor;
pub mod download;
pub mod error;
pub mod manifest;
pub mod sha1_digest;
pub mod verification;
pub mod version_id;
