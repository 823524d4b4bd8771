//! Mappings fetcher CLI entrypoint.
//!
//! This binary finds the local launcher installation, reads the version
//! manifest for the requested release, and downloads and verifies its client
//! and server mapping files. Saved paths are printed on stdout.

use camino::Utf8Path;
use clap::Parser;
use mappings_fetcher::artefact::version_id::VersionId;
use mappings_fetcher::cli::Cli;
use mappings_fetcher::config::FetcherConfig;
use mappings_fetcher::dirs::{BaseDirs, SystemBaseDirs};
use mappings_fetcher::error::{EXIT_SUCCESS, FetcherError, Result};
use mappings_fetcher::locate::{resolve_game_dir, versions_dir};
use mappings_fetcher::output::{dry_run_text, error_text, success_text, write_stderr_line};
use mappings_fetcher::pipeline::{FetchConfig, fetch_mappings, plan};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Output root used when neither the flag nor the config file names one.
const DEFAULT_OUTPUT_DIR: &str = "mappings";

/// Everything a run needs once flags, config and discovery are merged.
struct Settings {
    config: FetcherConfig,
    version: VersionId,
    versions_dir: PathBuf,
    output_root: PathBuf,
}

impl Settings {
    fn fetch_config(&self, quiet: bool) -> FetchConfig<'_> {
        FetchConfig {
            version: &self.version,
            versions_dir: &self.versions_dir,
            output_root: &self.output_root,
            quiet,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &SystemBaseDirs, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != EXIT_SUCCESS {
        std::process::exit(exit_code);
    }
}

fn run(
    cli: &Cli,
    dirs: &dyn BaseDirs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let cwd = std::env::current_dir().map_err(|source| FetcherError::CurrentDir { source })?;
    run_in(cli, dirs, &cwd, stdout, stderr)
}

fn run_in(
    cli: &Cli,
    dirs: &dyn BaseDirs,
    cwd: &Path,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    let settings = resolve_settings(cli, dirs, cwd)?;
    let fetch = settings.fetch_config(cli.quiet);

    // Dry-run mode: resolve everything but touch neither network nor output
    if cli.dry_run {
        let plan = plan(&fetch)?;
        return write_stdout_line(stdout, dry_run_text(&plan));
    }

    let report = fetch_mappings(&fetch, settings.config.timeouts(), stderr)?;
    write_stdout_line(stdout, success_text(&report))
}

/// Merges flags over the config file and resolves the directories.
fn resolve_settings(cli: &Cli, dirs: &dyn BaseDirs, cwd: &Path) -> Result<Settings> {
    let version = VersionId::try_from(cli.release.as_str())?;

    let mut config = FetcherConfig::load(cli.config.as_deref().map(Utf8Path::as_std_path), dirs)?;
    if let Some(secs) = cli.timeout {
        config = config.with_timeout_secs(secs)?;
    }

    let game_dir_override = cli
        .minecraft
        .as_deref()
        .map(Utf8Path::as_std_path)
        .or(config.game_dir.as_deref())
        .map(|dir| cwd.join(dir));
    let game_dir = resolve_game_dir(game_dir_override.as_deref(), dirs)?;
    let versions_dir = versions_dir(&game_dir)?;

    let output_root = cli
        .output_dir
        .as_deref()
        .map(Utf8Path::as_std_path)
        .or(config.output_dir.as_deref())
        .map_or_else(|| cwd.join(DEFAULT_OUTPUT_DIR), |dir| cwd.join(dir));

    Ok(Settings {
        config,
        version,
        versions_dir,
        output_root,
    })
}

fn write_stdout_line(stdout: &mut dyn Write, text: impl fmt::Display) -> Result<()> {
    writeln!(stdout, "{text}").map_err(|source| FetcherError::WriteFailed { source })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {}", error_text(&err)));
            err.exit_code()
        }
    }
}
