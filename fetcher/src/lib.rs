//! Mappings fetcher library.
//!
//! This crate locates a release's version manifest in a local launcher
//! installation, downloads the client and server obfuscation mappings it
//! references, and verifies both against their published SHA-1 digests. It is
//! used by the `mappings-fetcher` CLI binary and can be consumed
//! programmatically.
//!
//! # Modules
//!
//! - [`artefact`] - Manifest, descriptor, download and verification domain
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Optional TOML configuration file
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`error`] - Top-level error type and exit codes
//! - [`locate`] - Game directory discovery
//! - [`output`] - Status lines and summary rendering
//! - [`pipeline`] - Fetch-and-verify orchestration

pub mod artefact;
pub mod cli;
pub mod config;
pub mod dirs;
pub mod error;
pub mod locate;
pub mod output;
pub mod pipeline;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
