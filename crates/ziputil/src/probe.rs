//! Archive probing functionality for reading metadata without extraction.

use crate::error::ZipUtilError;
use crate::types::{ArchiveEntry, ArchiveInfo};
use std::fs::{self, File};
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Probe an archive to retrieve metadata without extracting.
///
/// This function reads the central directory to determine:
/// - Number of entries and their raw names
/// - Compressed and uncompressed sizes
/// - Whether any entry is encrypted
///
/// Entry names are reported exactly as stored. Probing never judges whether
/// an entry would be safe to extract.
///
/// # Errors
///
/// Returns an error if:
/// - The archive file doesn't exist
/// - The container is corrupted or not a zip file
/// - The archive cannot be read
pub fn probe_archive(path: &Path) -> Result<ArchiveInfo, ZipUtilError> {
    // Check if file exists
    if !path.exists() {
        return Err(ZipUtilError::SourceNotFound(path.to_path_buf()));
    }

    // Get compressed size from file metadata
    let compressed_bytes = Some(fs::metadata(path)?.len());

    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;
    let (entry_list, encrypted) = list_zip_entries(&mut archive)?;

    let entries = entry_list.len() as u64;
    let uncompressed_estimate = if !entry_list.is_empty() {
        Some(entry_list.iter().map(|e| e.size).sum())
    } else {
        None
    };

    Ok(ArchiveInfo {
        entries,
        compressed_bytes,
        uncompressed_estimate,
        encrypted,
        entry_list,
    })
}

/// List entries in a ZIP archive in native order.
fn list_zip_entries<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<(Vec<ArchiveEntry>, bool), ZipUtilError> {
    let mut entries = Vec::with_capacity(archive.len());
    let mut encrypted = false;

    for i in 0..archive.len() {
        // Raw access works for encrypted entries without a password
        let entry = archive.by_index_raw(i)?;

        if entry.encrypted() {
            encrypted = true;
        }

        entries.push(ArchiveEntry {
            path: entry.name().to_string(),
            is_directory: entry.is_dir(),
            size: entry.size(),
            compressed_size: Some(entry.compressed_size()),
        });
    }

    Ok((entries, encrypted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_probe_nonexistent_file() {
        let path = PathBuf::from("nonexistent.zip");
        let result = probe_archive(&path);
        assert!(matches!(result, Err(ZipUtilError::SourceNotFound(_))));
    }

    #[test]
    fn test_probe_not_a_zip() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.zip");
        fs::write(&path, b"definitely not a zip archive").unwrap();

        let result = probe_archive(&path);
        assert!(matches!(result, Err(ZipUtilError::Corrupted(_))));
    }
}
