//! Type definitions for archiving, extraction and probing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Individual entry within an archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Raw entry name as stored in the archive
    pub path: String,

    /// Whether this entry is a directory marker
    pub is_directory: bool,

    /// Uncompressed size in bytes
    pub size: u64,

    /// Compressed size in bytes (if available)
    pub compressed_size: Option<u64>,
}

/// Metadata information about an archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveInfo {
    /// Number of entries in the archive
    pub entries: u64,

    /// Size of the archive file on disk
    pub compressed_bytes: Option<u64>,

    /// Sum of the uncompressed entry sizes (if any entries exist)
    pub uncompressed_estimate: Option<u64>,

    /// Whether any entry is password-protected
    pub encrypted: bool,

    /// List of all entries in native archive order
    pub entry_list: Vec<ArchiveEntry>,
}

/// Options for creating an archive.
#[derive(Debug, Clone)]
pub struct ArchiveOptions {
    /// Compression method applied to every entry
    pub compression: Compression,

    /// Codec-specific compression level, `None` for the codec default
    pub compression_level: Option<i64>,

    /// Whether symbolic links are followed while walking the source
    pub follow_symlinks: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression: Compression::Deflated,
            compression_level: None,
            follow_symlinks: true,
        }
    }
}

/// Compression method used when writing entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// No compression
    Stored,

    /// DEFLATE compression
    Deflated,
}

impl Compression {
    pub(crate) fn to_zip(self) -> zip::CompressionMethod {
        match self {
            Compression::Stored => zip::CompressionMethod::Stored,
            Compression::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stored" | "store" | "none" => Ok(Compression::Stored),
            "deflated" | "deflate" => Ok(Compression::Deflated),
            other => Err(format!("unknown compression method: {}", other)),
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::Stored => f.write_str("stored"),
            Compression::Deflated => f.write_str("deflated"),
        }
    }
}

/// Statistics about a completed archive operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveStats {
    /// Number of file entries written
    pub files_archived: u64,

    /// Total source bytes streamed into the archive
    pub bytes_read: u64,

    /// Duration of the operation (in seconds)
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Statistics about a completed extraction operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Number of files successfully extracted
    pub files_extracted: u64,

    /// Number of directory entries materialized
    pub directories_created: u64,

    /// Total bytes written to disk
    pub bytes_written: u64,

    /// Duration of the extraction operation (in seconds)
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

// Helper module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
