//! # ZipUtil
//!
//! Pack a file or directory tree into a zip archive and unpack a zip archive
//! into a directory, with protection against path traversal ("zip slip")
//! during extraction.
//!
//! Two entry points are provided for each operation:
//!
//! - [`archive`] and [`extract`] return a plain `bool`. Every failure is
//!   logged through `tracing` and collapsed to `false`.
//! - [`try_archive`] and [`try_extract`] return the typed
//!   [`ZipUtilError`] and operation statistics.
//!
//! Both operations are synchronous and do unbounded file I/O. Async callers
//! should go through [`background`] or their own blocking pool.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use ziputil::{try_archive, try_extract, ArchiveOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let stats = try_archive(
//!     Path::new("reports"),
//!     Path::new("backup/reports.zip"),
//!     &ArchiveOptions::default(),
//! )?;
//! println!("Archived {} files", stats.files_archived);
//!
//! let stats = try_extract(Path::new("backup/reports.zip"), Path::new("restored"))?;
//! println!("Extracted {} files ({} bytes)", stats.files_extracted, stats.bytes_written);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod background;
pub mod copy;
pub mod error;
pub mod extract;
pub mod probe;
pub mod safety;
pub mod types;

// Re-export main types
pub use error::{ErrorKind, SecurityError, ZipUtilError};
pub use types::{
    ArchiveEntry, ArchiveInfo, ArchiveOptions, ArchiveStats, Compression, ExtractStats,
};

use std::path::Path;

/// Archive a file or directory into a zip file.
///
/// Returns `true` once the archive has been completely written. On any
/// failure a partially written destination is removed and `false` is
/// returned; the cause is logged.
pub fn archive(source: &Path, destination: &Path) -> bool {
    match try_archive(source, destination, &ArchiveOptions::default()) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(
                kind = ?e.kind(),
                "Error while archiving '{}': {}",
                destination.display(),
                e
            );
            false
        }
    }
}

/// Extract a zip archive into a directory.
///
/// Returns `true` once every entry has been written. On failure `false` is
/// returned and the cause is logged. Files written before the failure are
/// left in place.
pub fn extract(archive_path: &Path, destination_dir: &Path) -> bool {
    match try_extract(archive_path, destination_dir) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(
                kind = ?e.kind(),
                "Error while extracting '{}': {}",
                archive_path.display(),
                e
            );
            false
        }
    }
}

/// Archive a file or directory, returning statistics or the typed error.
///
/// # Errors
///
/// Returns an error if:
/// - `source` or `destination` is blank
/// - `source` does not exist or is neither a file nor a directory
/// - `destination` is `source` itself
/// - A file under `source` has a name that is not valid UTF-8; such trees
///   are rejected rather than archived with lossy entry names
/// - An I/O error occurs while walking, reading or writing
pub fn try_archive(
    source: &Path,
    destination: &Path,
    options: &ArchiveOptions,
) -> Result<ArchiveStats, ZipUtilError> {
    archive::archive_path(source, destination, options)
}

/// Extract a zip archive, returning statistics or the typed error.
///
/// # Errors
///
/// Returns an error if:
/// - `archive_path` or `destination_dir` is blank
/// - The archive does not exist or is corrupted
/// - `destination_dir` exists and is not a directory
/// - An entry resolves outside `destination_dir`
/// - An I/O error occurs
pub fn try_extract(archive_path: &Path, destination_dir: &Path) -> Result<ExtractStats, ZipUtilError> {
    extract::extract_archive(archive_path, destination_dir)
}

/// Probe an archive to retrieve metadata without extracting.
///
/// # Errors
///
/// Returns an error if the archive doesn't exist or cannot be parsed.
pub fn probe(path: &Path) -> Result<ArchiveInfo, ZipUtilError> {
    probe::probe_archive(path)
}
