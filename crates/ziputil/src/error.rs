//! Error types for archiving and extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for archive and extract operations.
#[derive(Debug, Error)]
pub enum ZipUtilError {
    /// A source, destination, archive or extraction directory argument is blank.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The archiving source or the archive to extract does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(PathBuf),

    /// The extraction target exists and is not a directory.
    #[error("Destination is not a directory: {0}")]
    DestinationConflict(PathBuf),

    /// A security violation was detected during extraction.
    #[error("Security violation: {0}")]
    Security(#[from] SecurityError),

    /// The archive container is corrupted or uses an unsupported feature.
    #[error("Corrupted archive: {0}")]
    Corrupted(String),

    /// An I/O error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Security-related errors during extraction.
#[derive(Debug, Error)]
pub enum SecurityError {
    /// Entry resolves outside the destination directory (zip slip).
    #[error("Path traversal attempt: {0}")]
    PathTraversal(String),

    /// Entry carries a root or drive prefix that cannot live under the destination.
    #[error("Absolute path not allowed: {0}")]
    AbsolutePath(String),
}

/// Coarse classification of a [`ZipUtilError`], stable enough for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    SourceNotFound,
    DestinationConflict,
    IoFailure,
    PathTraversalDetected,
}

impl ZipUtilError {
    /// Returns the kind of failure this error represents.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZipUtilError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            ZipUtilError::SourceNotFound(_) => ErrorKind::SourceNotFound,
            ZipUtilError::DestinationConflict(_) => ErrorKind::DestinationConflict,
            ZipUtilError::Security(_) => ErrorKind::PathTraversalDetected,
            ZipUtilError::Corrupted(_) | ZipUtilError::Io(_) => ErrorKind::IoFailure,
        }
    }
}

impl From<zip::result::ZipError> for ZipUtilError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io_err) => ZipUtilError::Io(io_err),
            other => ZipUtilError::Corrupted(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for ZipUtilError {
    fn from(e: walkdir::Error) -> Self {
        let message = e.to_string();
        match e.into_io_error() {
            Some(io_err) => ZipUtilError::Io(io_err),
            // Symlink loops carry no io::Error
            None => ZipUtilError::Io(std::io::Error::other(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            ZipUtilError::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            ZipUtilError::SourceNotFound(PathBuf::from("a")).kind(),
            ErrorKind::SourceNotFound
        );
        assert_eq!(
            ZipUtilError::DestinationConflict(PathBuf::from("a")).kind(),
            ErrorKind::DestinationConflict
        );
        assert_eq!(
            ZipUtilError::Corrupted("bad".into()).kind(),
            ErrorKind::IoFailure
        );
        assert_eq!(
            ZipUtilError::from(SecurityError::AbsolutePath("/x".into())).kind(),
            ErrorKind::PathTraversalDetected
        );
    }

    #[test]
    fn test_zip_error_conversion() {
        let io = zip::result::ZipError::Io(std::io::Error::other("disk full"));
        assert!(matches!(ZipUtilError::from(io), ZipUtilError::Io(_)));

        let invalid = zip::result::ZipError::InvalidArchive("bad header".into());
        match ZipUtilError::from(invalid) {
            ZipUtilError::Corrupted(msg) => assert!(msg.contains("bad header")),
            e => panic!("Expected Corrupted, got: {:?}", e),
        }
    }
}
