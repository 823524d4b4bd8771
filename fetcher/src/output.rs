//! Output formatting for the fetcher CLI.
//!
//! Progress goes to stderr through [`write_stderr_line`]; this module also
//! renders the dry-run plan, the final summary and fatal errors.

use std::error::Error;
use std::fmt;
use std::io::Write;

use crate::artefact::descriptor::ArtifactKind;
use crate::pipeline::{FetchPlan, FetchReport};

/// Write one line to `stderr`, ignoring failures.
///
/// Progress output is best effort; a closed stderr must not abort a
/// download.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Render `err` followed by each of its causes, separated by `": "`.
///
/// Error messages never repeat their source, so every cause appears once.
///
/// # Examples
///
/// ```
/// use mappings_fetcher::output::error_text;
///
/// let err = std::io::Error::other("disk full");
/// assert_eq!(error_text(&err), "disk full");
/// ```
#[must_use]
pub fn error_text(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        cause = inner.source();
    }
    text
}

/// Format the summary printed after a successful run.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use mappings_fetcher::artefact::descriptor::ArtifactKind;
/// use mappings_fetcher::artefact::sha1_digest::Sha1Digest;
/// use mappings_fetcher::output::success_text;
/// use mappings_fetcher::pipeline::{FetchReport, FetchedArtifact};
///
/// let digest = Sha1Digest::try_from("aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d")
///     .expect("valid digest");
/// let artifact = |kind: ArtifactKind, name: &str| FetchedArtifact {
///     kind,
///     path: PathBuf::from("mappings/1.16.5").join(name),
///     bytes_written: 5,
///     digest: digest.clone(),
/// };
/// let report = FetchReport {
///     manifest_path: PathBuf::from("versions/1.16.5/1.16.5.json"),
///     client: artifact(ArtifactKind::Client, "client.txt"),
///     server: artifact(ArtifactKind::Server, "server.txt"),
/// };
/// assert!(success_text(&report).contains("Saved client mappings to: mappings/1.16.5/client.txt"));
/// ```
#[must_use]
pub fn success_text(report: &FetchReport) -> String {
    [&report.client, &report.server]
        .iter()
        .map(|artifact| {
            format!(
                "Saved {} mappings to: {}",
                artifact.kind,
                artifact.path.display()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a dry-run plan for display.
#[must_use]
pub fn dry_run_text(plan: &FetchPlan) -> String {
    let mut lines = vec![
        "Dry run - nothing will be downloaded".to_owned(),
        String::new(),
        format!("Manifest: {}", plan.manifest_path.display()),
        format!("Output directory: {}", plan.output_dir.display()),
    ];

    for kind in ArtifactKind::ALL {
        let descriptor = plan.descriptors.get(kind);
        lines.push(String::new());
        lines.push(format!("{kind} mappings:"));
        lines.push(format!("  URL: {}", descriptor.url()));
        lines.push(format!("  SHA-1: {}", descriptor.expected_digest()));
        lines.push(format!("  Destination: {}", plan.destination(kind).display()));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::descriptor::{ArtifactDescriptor, MappingDescriptors};
    use crate::artefact::sha1_digest::Sha1Digest;
    use crate::pipeline::FetchedArtifact;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    fn digest(c: char) -> Sha1Digest {
        Sha1Digest::try_from(c.to_string().repeat(40)).expect("valid digest")
    }

    #[fixture]
    fn plan() -> FetchPlan {
        FetchPlan {
            manifest_path: PathBuf::from("/games/versions/1.16.5/1.16.5.json"),
            descriptors: MappingDescriptors {
                client: ArtifactDescriptor::new(ArtifactKind::Client, "http://x/c", digest('a')),
                server: ArtifactDescriptor::new(ArtifactKind::Server, "http://x/s", digest('b')),
            },
            output_dir: PathBuf::from("/work/mappings/1.16.5"),
        }
    }

    #[rstest]
    fn dry_run_lists_both_artifacts(plan: FetchPlan) {
        let text = dry_run_text(&plan);

        assert!(text.starts_with("Dry run"));
        assert!(text.contains("Manifest: /games/versions/1.16.5/1.16.5.json"));
        assert!(text.contains("client mappings:"));
        assert!(text.contains("  URL: http://x/s"));
        assert!(text.contains(&format!("  SHA-1: {}", "a".repeat(40))));
        assert!(text.contains("/work/mappings/1.16.5/server.txt"));
    }

    #[test]
    fn success_text_lists_saved_paths_in_order() {
        let artifact = |kind: ArtifactKind| FetchedArtifact {
            kind,
            path: PathBuf::from("out").join(kind.file_name()),
            bytes_written: 1,
            digest: digest('c'),
        };
        let report = FetchReport {
            manifest_path: PathBuf::from("m.json"),
            client: artifact(ArtifactKind::Client),
            server: artifact(ArtifactKind::Server),
        };

        let text = success_text(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().is_some_and(|l| l.starts_with("Saved client mappings")));
        assert!(lines.last().is_some_and(|l| l.starts_with("Saved server mappings")));
    }

    #[derive(Debug, thiserror::Error)]
    #[error("outer")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn error_text_appends_each_cause_once() {
        let err = Outer(std::io::Error::other("inner"));

        assert_eq!(err.to_string(), "outer");
        assert_eq!(error_text(&err), "outer: inner");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_stderr_line_ignores_write_failures() {
        write_stderr_line(&mut ClosedPipe, "progress");
    }
}
