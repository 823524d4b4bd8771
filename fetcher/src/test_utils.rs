//! Shared test utilities for the fetcher crate.

use std::path::Path;

use sha1::{Digest, Sha1};

/// Computes the lowercase hex SHA-1 of `data`.
#[must_use]
pub fn sha1_hex(data: &[u8]) -> String {
    Sha1::digest(data)
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

/// Builds a version manifest document with the given mapping descriptors.
///
/// The document also carries the unrelated fields a launcher manifest
/// normally has, so extraction is exercised against realistic input.
#[must_use]
pub fn version_manifest_json(
    version: &str,
    client_url: &str,
    client_sha1: &str,
    server_url: &str,
    server_sha1: &str,
) -> String {
    serde_json::json!({
        "id": version,
        "type": "release",
        "mainClass": "net.minecraft.client.main.Main",
        "downloads": {
            "client": {
                "sha1": "1".repeat(40),
                "size": 17_547_153,
                "url": "https://launcher.test/client.jar"
            },
            "client_mappings": {
                "sha1": client_sha1,
                "size": 5_746_047,
                "url": client_url
            },
            "server_mappings": {
                "sha1": server_sha1,
                "size": 4_400_926,
                "url": server_url
            }
        }
    })
    .to_string()
}

/// Writes `json` to `<versions_dir>/<version>/<version>.json`.
///
/// # Panics
///
/// Panics if the directory or file cannot be written.
#[expect(
    clippy::expect_used,
    reason = "fixture setup should fail the test loudly when the disk is unwritable"
)]
pub fn write_manifest(versions_dir: &Path, version: &str, json: &str) {
    let dir = versions_dir.join(version);
    std::fs::create_dir_all(&dir).expect("create version directory");
    let path = dir.join(format!("{version}.json"));
    std::fs::write(path, json).expect("write version manifest");
}
