//! Archive extraction with zip-slip protection.

use crate::copy::{copy_chunked, BUFFER_SIZE};
use crate::error::ZipUtilError;
use crate::safety::{require_named, resolve_entry_target};
use crate::types::ExtractStats;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use std::time::Instant;
use zip::ZipArchive;

/// Extract a zip archive into the specified output directory.
///
/// This function performs extraction with the following guarantees:
/// - Every entry is resolved against the canonical output directory before
///   anything is written for it
/// - The first entry resolving outside the output directory aborts the whole
///   extraction
/// - Parent directories are created right before each file is written, so
///   entry order does not matter
/// - Existing files are overwritten, duplicate names resolve last-one-wins
///
/// Nothing is rolled back on failure: files written for earlier entries stay
/// on disk.
///
/// # Arguments
///
/// * `archive_path` - Path to the zip file
/// * `output_dir` - Directory where files will be extracted, created if absent
///
/// # Returns
///
/// Returns `ExtractStats` with extraction statistics on success.
pub fn extract_archive(archive_path: &Path, output_dir: &Path) -> Result<ExtractStats, ZipUtilError> {
    let start_time = Instant::now();

    require_named(archive_path, "Archive")?;
    require_named(output_dir, "Extraction directory")?;

    // Checked before the output directory is created so a missing archive
    // leaves no directory behind
    if !archive_path.exists() {
        return Err(ZipUtilError::SourceNotFound(archive_path.to_path_buf()));
    }

    if output_dir.exists() && !output_dir.is_dir() {
        return Err(ZipUtilError::DestinationConflict(output_dir.to_path_buf()));
    }

    // Create output directory if it doesn't exist
    fs::create_dir_all(output_dir)?;
    let canonical_root = fs::canonicalize(output_dir)?;

    tracing::info!(
        "Extracting '{}' into '{}'",
        archive_path.display(),
        canonical_root.display()
    );

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let mut stats = extract_entries(&mut archive, &canonical_root)?;
    stats.duration = start_time.elapsed();

    tracing::info!(
        "Extracted {} files and {} directories ({} bytes) from '{}'",
        stats.files_extracted,
        stats.directories_created,
        stats.bytes_written,
        archive_path.display()
    );
    Ok(stats)
}

fn extract_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    canonical_root: &Path,
) -> Result<ExtractStats, ZipUtilError> {
    let mut stats = ExtractStats::default();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();

        let target = resolve_entry_target(canonical_root, &name).map_err(|e| {
            if matches!(e, ZipUtilError::Security(_)) {
                tracing::warn!(
                    "Entry is outside of the target directory. Potential malicious file: {}",
                    name
                );
            }
            e
        })?;

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            stats.directories_created += 1;
            tracing::debug!("Created directory '{}'", name);
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut output = BufWriter::new(File::create(&target)?);
        let written = copy_chunked(&mut entry, &mut output, &mut buffer)?;
        output.flush()?;

        stats.files_extracted += 1;
        stats.bytes_written += written;
        tracing::debug!("Extracted '{}' ({} bytes)", name, written);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_in_memory(entries: &[(&str, Option<&[u8]>)]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            match content {
                Some(bytes) => {
                    writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                    writer.write_all(bytes).unwrap();
                }
                None => writer.add_directory(*name, SimpleFileOptions::default()).unwrap(),
            }
        }
        let cursor = writer.finish().unwrap();
        ZipArchive::new(cursor).unwrap()
    }

    #[test]
    fn test_extract_entries_counts() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        let mut archive = zip_in_memory(&[
            ("empty/", None),
            ("a.txt", Some(&b"abc"[..])),
            ("nested/b.txt", Some(&b"defg"[..])),
        ]);

        let stats = extract_entries(&mut archive, &root).unwrap();
        assert_eq!(stats.files_extracted, 2);
        assert_eq!(stats.directories_created, 1);
        assert_eq!(stats.bytes_written, 7);
        assert!(root.join("empty").is_dir());
        assert_eq!(fs::read(root.join("nested/b.txt")).unwrap(), b"defg");
    }

    #[test]
    fn test_extract_entries_file_before_its_directory_entry() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        let mut archive =
            zip_in_memory(&[("deep/er/file.txt", Some(&b"x"[..])), ("deep/", None)]);

        extract_entries(&mut archive, &root).unwrap();
        assert_eq!(fs::read(root.join("deep/er/file.txt")).unwrap(), b"x");
    }

    #[test]
    fn test_extract_entries_duplicate_names_last_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = fs::canonicalize(temp_dir.path()).unwrap();
        let mut archive = zip_in_memory(&[
            ("dup.txt", Some(&b"first"[..])),
            ("./dup.txt", Some(&b"second"[..])),
        ]);

        extract_entries(&mut archive, &root).unwrap();
        assert_eq!(fs::read(root.join("dup.txt")).unwrap(), b"second");
    }

    #[test]
    fn test_extract_entries_stops_at_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("dest");
        fs::create_dir(&root).unwrap();
        let root = fs::canonicalize(root).unwrap();
        let mut archive = zip_in_memory(&[
            ("good.txt", Some(&b"ok"[..])),
            ("../evil.sh", Some(&b"rm -rf"[..])),
            ("after.txt", Some(&b"never"[..])),
        ]);

        let result = extract_entries(&mut archive, &root);
        assert!(matches!(result, Err(ZipUtilError::Security(_))));

        // Earlier entries are kept, later entries are never reached
        assert!(root.join("good.txt").exists());
        assert!(!root.join("after.txt").exists());
        assert!(!temp_dir.path().join("evil.sh").exists());
    }
}
