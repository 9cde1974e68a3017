//! Release metadata document (`<Name>-<version>.json`).

use serde::{Deserialize, Serialize};

use crate::checksum::Checksums;

/// Archive description inside [`ReleaseMetadata`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveInfo {
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Size formatted with [`format_size`].
    pub size_human: String,
}

/// Everything a mirror or updater needs to know about one release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    pub name: String,
    pub version: String,
    pub archive: ArchiveInfo,
    pub checksums: Checksums,
    /// Local time the release was generated, ISO 8601 without offset.
    pub generated_at: String,
    pub urls: Vec<String>,
}

/// Format a byte count with binary (1024) steps and two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    for unit in UNITS {
        if size < 1024.0 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} TB")
}

/// Current local time in the metadata timestamp format.
pub fn generated_at_now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
