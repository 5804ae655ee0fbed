use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use super::Dialect;

/// Number of hex characters kept from the SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 12;

/// Short content digest for display and change detection.
///
/// A 48-bit prefix can collide; callers must key identity on the path, never
/// on the fingerprint.
pub fn fingerprint(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = format!("{digest:x}");
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Immutable snapshot of one source file taken during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceModule {
    /// Absolute path at scan time.
    pub path: PathBuf,
    /// Base name, e.g. `HiveMind.ts`.
    pub filename: String,
    /// Path relative to the scan root, `/`-separated.
    pub relative_path: String,
    #[serde(skip)]
    pub content: String,
    pub fingerprint: String,
    pub line_count: usize,
    pub dialect: Dialect,
}

impl SourceModule {
    pub fn new(
        path: PathBuf,
        relative_path: String,
        content: String,
        dialect: Dialect,
    ) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            fingerprint: fingerprint(content.as_bytes()),
            line_count: content.lines().count(),
            path,
            filename,
            relative_path,
            content,
            dialect,
        }
    }
}
