//! CLI argument definitions for the mappings fetcher.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;

/// Download and verify the official obfuscation mappings for a release.
#[derive(Parser, Debug, Clone)]
#[command(name = "mappings-fetcher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download and verify the official obfuscation mappings for a release.\n\n",
    "The version manifest is read from the local launcher installation ",
    "(<game dir>/versions/<VERSION>/<VERSION>.json). The client and server ",
    "mapping files it references are downloaded to <output dir>/<VERSION>/ ",
    "as client.txt and server.txt and checked against the SHA-1 digests the ",
    "manifest publishes.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Fetch mappings for an installed release:\n",
    "    $ mappings-fetcher 1.16.5\n\n",
    "  Use a non-standard game directory:\n",
    "    $ mappings-fetcher --minecraft ~/games/minecraft 1.16.5\n\n",
    "  Preview without downloading:\n",
    "    $ mappings-fetcher --dry-run 1.16.5\n",
))]
pub struct Cli {
    /// Release identifier, e.g. 1.16.5.
    #[arg(value_name = "VERSION")]
    pub release: String,

    /// Game directory [default: platform-specific].
    #[arg(short, long = "minecraft", alias = "game-dir", value_name = "DIR")]
    pub minecraft: Option<Utf8PathBuf>,

    /// Output root; files land in <DIR>/<VERSION>/ [default: ./mappings].
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Configuration file [default: platform config directory].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Whole-request timeout in seconds, including the body download
    /// [default: 300].
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Resolve and print the download plan without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
