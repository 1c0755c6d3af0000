//! Run archive operations on tokio's blocking thread pool.
//!
//! Both operations do unbounded file I/O, so async callers must not run them
//! on a runtime worker thread. These helpers must be called from within a
//! tokio runtime.

use std::path::PathBuf;
use tokio::task::JoinHandle;

/// Archive `source` into `destination` on the blocking pool.
pub fn archive_in_background(source: PathBuf, destination: PathBuf) -> JoinHandle<bool> {
    tokio::task::spawn_blocking(move || crate::archive(&source, &destination))
}

/// Extract `archive` into `destination` on the blocking pool.
pub fn extract_in_background(archive: PathBuf, destination: PathBuf) -> JoinHandle<bool> {
    tokio::task::spawn_blocking(move || crate::extract(&archive, &destination))
}
