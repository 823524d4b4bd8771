//! Artifact descriptor extraction.
//!
//! Reads the client and server mapping entries out of a parsed
//! [`VersionManifest`]. The key paths are fixed:
//!
//! ```text
//! downloads.client_mappings.{url,sha1}
//! downloads.server_mappings.{url,sha1}
//! ```
//!
//! Extraction is a pure read of the manifest document.

use std::fmt;

use serde_json::Value;

use super::manifest::VersionManifest;
use super::sha1_digest::Sha1Digest;

/// Top-level manifest key holding the download entries.
const DOWNLOADS_KEY: &str = "downloads";
/// Key of the download URL within an entry.
const URL_KEY: &str = "url";
/// Key of the expected digest within an entry.
const SHA1_KEY: &str = "sha1";

/// Which of the two mapping artifacts a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The client mapping file.
    Client,
    /// The server mapping file.
    Server,
}

impl ArtifactKind {
    /// Both artifacts, in pipeline order.
    pub const ALL: [Self; 2] = [Self::Client, Self::Server];

    /// The manifest key under `downloads` for this artifact.
    #[must_use]
    pub const fn manifest_key(self) -> &'static str {
        match self {
            Self::Client => "client_mappings",
            Self::Server => "server_mappings",
        }
    }

    /// The file name the artifact is saved under.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Client => "client.txt",
            Self::Server => "server.txt",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Errors arising from descriptor extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    /// A required key is absent (or `null`).
    #[error("manifest is missing field \"{key}\" at {parent}")]
    MissingField {
        /// The absent key.
        key: String,
        /// Dotted path of the object that should contain it.
        parent: String,
    },

    /// A key is present but holds an unusable value.
    #[error("manifest field {path} is invalid: {reason}")]
    InvalidField {
        /// Dotted path of the offending field.
        path: String,
        /// Description of the problem.
        reason: String,
    },
}

/// The download location and expected checksum of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    kind: ArtifactKind,
    url: String,
    expected_digest: Sha1Digest,
}

impl ArtifactDescriptor {
    /// Create a descriptor from already validated parts.
    #[must_use]
    pub fn new(kind: ArtifactKind, url: impl Into<String>, expected_digest: Sha1Digest) -> Self {
        Self {
            kind,
            url: url.into(),
            expected_digest,
        }
    }

    /// Which artifact this descriptor belongs to.
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// The remote location of the artifact.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The SHA-1 digest the downloaded bytes must hash to.
    #[must_use]
    pub fn expected_digest(&self) -> &Sha1Digest {
        &self.expected_digest
    }
}

/// The client and server descriptors of one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingDescriptors {
    /// Descriptor for `client_mappings`.
    pub client: ArtifactDescriptor,
    /// Descriptor for `server_mappings`.
    pub server: ArtifactDescriptor,
}

impl MappingDescriptors {
    /// Return the descriptor for `kind`.
    #[must_use]
    pub fn get(&self, kind: ArtifactKind) -> &ArtifactDescriptor {
        match kind {
            ArtifactKind::Client => &self.client,
            ArtifactKind::Server => &self.server,
        }
    }
}

/// Extract both mapping descriptors from `manifest`.
///
/// # Errors
///
/// Returns [`DescriptorError::MissingField`] naming the first absent key, or
/// [`DescriptorError::InvalidField`] when a value is not a string or the
/// digest is not 40 lowercase hex characters.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use mappings_fetcher::artefact::descriptor::extract;
/// use mappings_fetcher::artefact::manifest::VersionManifest;
/// use mappings_fetcher::artefact::version_id::VersionId;
///
/// let json = concat!(
///     r#"{"downloads":{"#,
///     r#""client_mappings":{"url":"http://x/c","sha1":"aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"},"#,
///     r#""server_mappings":{"url":"http://x/s","sha1":"aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d"}}}"#,
/// );
/// let version = VersionId::try_from("1.16.5").expect("valid version");
/// let manifest = VersionManifest::from_json(version, PathBuf::from("1.16.5.json"), json)
///     .expect("valid JSON");
/// let descriptors = extract(&manifest).expect("descriptors present");
/// assert_eq!(descriptors.client.url(), "http://x/c");
/// ```
pub fn extract(manifest: &VersionManifest) -> Result<MappingDescriptors, DescriptorError> {
    let downloads = required_object(manifest.document(), DOWNLOADS_KEY, "<root>")?;
    Ok(MappingDescriptors {
        client: extract_one(downloads, ArtifactKind::Client)?,
        server: extract_one(downloads, ArtifactKind::Server)?,
    })
}

fn extract_one(downloads: &Value, kind: ArtifactKind) -> Result<ArtifactDescriptor, DescriptorError> {
    let entry_key = kind.manifest_key();
    let entry = required_object(downloads, entry_key, DOWNLOADS_KEY)?;
    let parent = format!("{DOWNLOADS_KEY}.{entry_key}");

    let url = required_str(entry, URL_KEY, &parent)?;
    if url.trim().is_empty() {
        return Err(DescriptorError::InvalidField {
            path: format!("{parent}.{URL_KEY}"),
            reason: "URL must not be empty".to_owned(),
        });
    }

    let sha1 = required_str(entry, SHA1_KEY, &parent)?;
    let expected_digest =
        Sha1Digest::try_from(sha1).map_err(|err| DescriptorError::InvalidField {
            path: format!("{parent}.{SHA1_KEY}"),
            reason: err.to_string(),
        })?;

    Ok(ArtifactDescriptor::new(kind, url, expected_digest))
}

fn required<'a>(object: &'a Value, key: &str, parent: &str) -> Result<&'a Value, DescriptorError> {
    match object.get(key) {
        Some(Value::Null) | None => Err(DescriptorError::MissingField {
            key: key.to_owned(),
            parent: parent.to_owned(),
        }),
        Some(value) => Ok(value),
    }
}

fn required_object<'a>(
    object: &'a Value,
    key: &str,
    parent: &str,
) -> Result<&'a Value, DescriptorError> {
    let value = required(object, key, parent)?;
    if value.is_object() {
        Ok(value)
    } else {
        Err(DescriptorError::InvalidField {
            path: join_path(parent, key),
            reason: format!("expected an object, found {}", json_type(value)),
        })
    }
}

fn required_str<'a>(object: &'a Value, key: &str, parent: &str) -> Result<&'a str, DescriptorError> {
    let value = required(object, key, parent)?;
    value.as_str().ok_or_else(|| DescriptorError::InvalidField {
        path: join_path(parent, key),
        reason: format!("expected a string, found {}", json_type(value)),
    })
}

fn join_path(parent: &str, key: &str) -> String {
    if parent == "<root>" {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::version_id::VersionId;
    use rstest::rstest;
    use std::path::PathBuf;

    const CLIENT_SHA: &str = "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d";
    const SERVER_SHA: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";

    fn valid_manifest_json() -> String {
        format!(
            concat!(
                r#"{{"id":"1.16.5","downloads":{{"#,
                r#""client":{{"url":"https://launcher.test/client.jar","sha1":"{j}"}},"#,
                r#""client_mappings":{{"url":"http://x/c","sha1":"{c}"}},"#,
                r#""server_mappings":{{"url":"http://x/s","sha1":"{s}"}}}}}}"#,
            ),
            c = CLIENT_SHA,
            s = SERVER_SHA,
            j = "0".repeat(40),
        )
    }

    fn manifest(json: &str) -> VersionManifest {
        let version = VersionId::try_from("1.16.5").expect("valid version");
        VersionManifest::from_json(version, PathBuf::from("1.16.5.json"), json)
            .expect("valid JSON")
    }

    #[test]
    fn extracts_both_descriptors() {
        let descriptors = extract(&manifest(&valid_manifest_json())).expect("descriptors");

        assert_eq!(descriptors.client.kind(), ArtifactKind::Client);
        assert_eq!(descriptors.client.url(), "http://x/c");
        assert_eq!(descriptors.client.expected_digest().as_str(), CLIENT_SHA);
        assert_eq!(descriptors.server.kind(), ArtifactKind::Server);
        assert_eq!(descriptors.server.url(), "http://x/s");
        assert_eq!(descriptors.server.expected_digest().as_str(), SERVER_SHA);
    }

    #[test]
    fn get_returns_descriptor_by_kind() {
        let descriptors = extract(&manifest(&valid_manifest_json())).expect("descriptors");
        for kind in ArtifactKind::ALL {
            assert_eq!(descriptors.get(kind).kind(), kind);
        }
    }

    #[rstest]
    #[case::no_downloads(r#"{"id":"1.16.5"}"#, "downloads", "<root>")]
    #[case::null_downloads(r#"{"downloads":null}"#, "downloads", "<root>")]
    #[case::no_client(
        r#"{"downloads":{"server_mappings":{"url":"u","sha1":"s"}}}"#,
        "client_mappings",
        "downloads"
    )]
    fn reports_missing_objects(#[case] json: &str, #[case] key: &str, #[case] parent: &str) {
        let err = extract(&manifest(json)).expect_err("expected missing field");
        assert_eq!(
            err,
            DescriptorError::MissingField {
                key: key.to_owned(),
                parent: parent.to_owned(),
            }
        );
    }

    #[test]
    fn reports_missing_server_entry() {
        let json = valid_manifest_json().replace("server_mappings", "server_other");
        let err = extract(&manifest(&json)).expect_err("expected missing field");
        assert!(
            matches!(err, DescriptorError::MissingField { ref key, .. } if key == "server_mappings")
        );
    }

    #[rstest]
    #[case::client_sha(
        format!(r#""client_mappings":{{"url":"http://x/c","sha1":"{CLIENT_SHA}"}}"#),
        r#""client_mappings":{"url":"http://x/c"}"#,
        "sha1",
        "downloads.client_mappings"
    )]
    #[case::server_url(
        r#""server_mappings":{"url":"http://x/s","#.to_owned(),
        r#""server_mappings":{"#,
        "url",
        "downloads.server_mappings"
    )]
    fn reports_missing_leaf_fields(
        #[case] from: String,
        #[case] to: &str,
        #[case] key: &str,
        #[case] parent: &str,
    ) {
        let json = valid_manifest_json().replace(&from, to);
        let err = extract(&manifest(&json)).expect_err("expected missing field");
        assert_eq!(
            err,
            DescriptorError::MissingField {
                key: key.to_owned(),
                parent: parent.to_owned(),
            }
        );
    }

    #[rstest]
    #[case::uppercase_digest(CLIENT_SHA, &CLIENT_SHA.to_ascii_uppercase(), "lowercase")]
    #[case::short_digest(CLIENT_SHA, "abc123", "expected 40 hex characters")]
    #[case::numeric_url(r#""http://x/c""#, "42", "expected a string, found a number")]
    #[case::empty_url("http://x/c", "", "URL must not be empty")]
    fn rejects_invalid_client_values(#[case] from: &str, #[case] to: &str, #[case] reason: &str) {
        let json = valid_manifest_json().replacen(from, to, 1);
        let err = extract(&manifest(&json)).expect_err("expected invalid field");
        assert!(
            matches!(err, DescriptorError::InvalidField { .. }),
            "unexpected error: {err}"
        );
        assert!(err.to_string().contains(reason), "unexpected error: {err}");
    }

    #[test]
    fn rejects_non_object_downloads() {
        let err = extract(&manifest(r#"{"downloads":[]}"#)).expect_err("expected invalid");
        assert_eq!(
            err,
            DescriptorError::InvalidField {
                path: "downloads".to_owned(),
                reason: "expected an object, found an array".to_owned(),
            }
        );
    }

    #[test]
    fn artifact_kind_names_and_files() {
        assert_eq!(ArtifactKind::Client.to_string(), "client");
        assert_eq!(ArtifactKind::Server.file_name(), "server.txt");
        assert_eq!(ArtifactKind::Client.manifest_key(), "client_mappings");
    }
}
