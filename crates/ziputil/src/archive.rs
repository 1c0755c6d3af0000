//! Archive creation from a single file or a directory tree.

use crate::copy::{copy_chunked, BUFFER_SIZE};
use crate::error::ZipUtilError;
use crate::safety::{entry_name, require_named};
use crate::types::{ArchiveOptions, ArchiveStats, Compression};
use std::fs::{self, File, Metadata};
use std::io::{self, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Entries at or above this size need ZIP64 extensions.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

/// Archive a file or directory into a zip file at `destination`.
///
/// Every regular file under `source` becomes one entry named by its path
/// relative to the entry-name base: `source` itself for a directory, its
/// parent for a single file. Names always use `/` separators. Directories get
/// no explicit entries.
///
/// Missing parent directories of `destination` are created. If anything fails
/// after the destination file has been created, that file is removed before
/// the error is returned. A failed removal is logged and never replaces the
/// original error. The source is only ever read.
///
/// # Arguments
///
/// * `source` - File or directory to archive
/// * `destination` - Zip file to create or overwrite
/// * `options` - Compression and traversal options
///
/// # Returns
///
/// Returns `ArchiveStats` with archiving statistics on success.
pub fn archive_path(
    source: &Path,
    destination: &Path,
    options: &ArchiveOptions,
) -> Result<ArchiveStats, ZipUtilError> {
    let start_time = Instant::now();

    require_named(source, "Source")?;
    require_named(destination, "Destination")?;
    validate_options(options)?;

    let metadata = match fs::metadata(source) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ZipUtilError::SourceNotFound(source.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    let base = entry_base(source, &metadata)?;

    if is_same_file(source, destination) {
        return Err(ZipUtilError::InvalidArgument(format!(
            "Destination '{}' would overwrite the source",
            destination.display()
        )));
    }

    ensure_parent_dirs(destination);

    tracing::info!(
        "Archiving '{}' into '{}'",
        source.display(),
        destination.display()
    );

    // Nothing has been written if this fails, so there is nothing to clean up
    let file = File::create(destination)?;

    match write_archive(file, source, &base, destination, options) {
        Ok(mut stats) => {
            stats.duration = start_time.elapsed();
            tracing::info!(
                "Archived {} files ({} bytes) into '{}'",
                stats.files_archived,
                stats.bytes_read,
                destination.display()
            );
            Ok(stats)
        }
        Err(e) => {
            cleanup_silently(destination);
            Err(e)
        }
    }
}

fn validate_options(options: &ArchiveOptions) -> Result<(), ZipUtilError> {
    if let (Compression::Deflated, Some(level)) = (options.compression, options.compression_level) {
        if !(0..=9).contains(&level) {
            return Err(ZipUtilError::InvalidArgument(format!(
                "Deflate compression level must be between 0 and 9, got {}",
                level
            )));
        }
    }
    Ok(())
}

/// Directory that entry names are computed relative to.
fn entry_base(source: &Path, metadata: &Metadata) -> Result<PathBuf, ZipUtilError> {
    if metadata.is_dir() {
        Ok(source.to_path_buf())
    } else if metadata.is_file() {
        // A lone file must archive as its own name, not an empty one
        Ok(source.parent().unwrap_or(Path::new("")).to_path_buf())
    } else {
        Err(ZipUtilError::InvalidArgument(format!(
            "Source must be a regular file or directory: {}",
            source.display()
        )))
    }
}

fn is_same_file(source: &Path, destination: &Path) -> bool {
    match (fs::canonicalize(source), fs::canonicalize(destination)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn ensure_parent_dirs(destination: &Path) {
    let Some(parent) = destination.parent() else {
        return;
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return;
    }
    // Creating the file afterwards reports the real failure
    if let Err(e) = fs::create_dir_all(parent) {
        tracing::warn!(
            "Could not create parent directories '{}': {}",
            parent.display(),
            e
        );
    }
}

fn write_archive(
    file: File,
    source: &Path,
    base: &Path,
    destination: &Path,
    options: &ArchiveOptions,
) -> Result<ArchiveStats, ZipUtilError> {
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut stats = ArchiveStats::default();
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let destination_canonical = fs::canonicalize(destination).ok();

    let walker = WalkDir::new(source)
        .follow_links(options.follow_symlinks)
        .contents_first(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if is_destination(path, destination, destination_canonical.as_deref()) {
            tracing::debug!("Skipping in-progress archive '{}'", path.display());
            continue;
        }

        let relative = path.strip_prefix(base).map_err(|_| {
            ZipUtilError::Io(io::Error::other(format!(
                "'{}' is not under '{}'",
                path.display(),
                base.display()
            )))
        })?;
        let name = entry_name(relative)?;

        let bytes = write_file_entry(&mut zip, path, &name, options, &mut buffer)?;
        stats.files_archived += 1;
        stats.bytes_read += bytes;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;
    Ok(stats)
}

fn is_destination(path: &Path, destination: &Path, canonical: Option<&Path>) -> bool {
    let Some(canonical) = canonical else {
        return false;
    };
    if path.file_name() != destination.file_name() {
        return false;
    }
    fs::canonicalize(path).map(|p| p == canonical).unwrap_or(false)
}

fn write_file_entry<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    path: &Path,
    name: &str,
    options: &ArchiveOptions,
    buffer: &mut [u8],
) -> Result<u64, ZipUtilError> {
    let mut input = File::open(path)?;
    let size = input.metadata()?.len();

    let mut file_options = SimpleFileOptions::default()
        .compression_method(options.compression.to_zip())
        .large_file(size >= ZIP64_THRESHOLD);
    if options.compression == Compression::Deflated {
        file_options = file_options.compression_level(options.compression_level);
    }

    zip.start_file(name, file_options)?;
    let written = copy_chunked(&mut input, zip, buffer)?;

    tracing::debug!("Archived '{}' ({} bytes)", name, written);
    Ok(written)
}

fn cleanup_silently(destination: &Path) {
    match fs::remove_file(destination) {
        Ok(()) => tracing::debug!(
            "Removed partially written archive '{}'",
            destination.display()
        ),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "Could not remove partially written archive '{}': {}",
            destination.display(),
            e
        ),
    }
}
