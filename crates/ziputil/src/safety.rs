//! Path safety helpers shared by the archiver and the extractor.
//!
//! Extraction never trusts an entry name on its own. The destination root is
//! joined with the raw name first, the result is canonicalized (symlinks and
//! `..` resolved), and only then compared against the canonical root. A plain
//! string check on the name cannot see symlinks that already exist on disk.

use crate::error::{SecurityError, ZipUtilError};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Upper bound on symlinks followed while resolving a single path.
const MAX_SYMLINK_HOPS: u32 = 40;

/// Returns `true` if the path has no usable final name.
///
/// The empty path, a bare root and a final component made only of whitespace
/// are blank. `.` and `..` are not.
pub fn is_blank(path: &Path) -> bool {
    match path.components().next_back() {
        None => true,
        Some(Component::Normal(name)) => name.to_string_lossy().trim().is_empty(),
        Some(Component::CurDir) | Some(Component::ParentDir) => false,
        Some(Component::RootDir) | Some(Component::Prefix(_)) => true,
    }
}

/// Fails with `InvalidArgument` when `path` is blank.
pub(crate) fn require_named(path: &Path, what: &str) -> Result<(), ZipUtilError> {
    if is_blank(path) {
        return Err(ZipUtilError::InvalidArgument(format!(
            "{} name cannot be blank",
            what
        )));
    }
    Ok(())
}

/// Builds an archive entry name from a path relative to the archiving root.
///
/// Components are joined with `/` regardless of the host separator. `.`
/// components are dropped. Parent, root and prefix components are rejected,
/// as is a path that normalizes to nothing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use ziputil::safety::entry_name;
///
/// let name = entry_name(Path::new("dir1/dir1_2/content3.txt")).unwrap();
/// assert_eq!(name, "dir1/dir1_2/content3.txt");
///
/// assert!(entry_name(Path::new("../escape.txt")).is_err());
/// assert!(entry_name(Path::new("")).is_err());
/// ```
pub fn entry_name(relative: &Path) -> Result<String, ZipUtilError> {
    let mut parts: Vec<&str> = Vec::new();

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                let part = part.to_str().ok_or_else(|| {
                    ZipUtilError::InvalidArgument(format!(
                        "Path contains invalid UTF-8: {}",
                        relative.display()
                    ))
                })?;
                parts.push(part);
            }
            Component::CurDir => continue,
            Component::ParentDir => {
                return Err(SecurityError::PathTraversal(relative.display().to_string()).into());
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(SecurityError::AbsolutePath(relative.display().to_string()).into());
            }
        }
    }

    if parts.is_empty() {
        return Err(ZipUtilError::InvalidArgument(format!(
            "Entry name normalizes to empty: '{}'",
            relative.display()
        )));
    }

    Ok(parts.join("/"))
}

/// Resolves an untrusted entry name under an already canonical root.
///
/// Returns the canonical target path when it is strictly nested under
/// `canonical_root`. A name that resolves to the root itself, to a sibling
/// sharing a string prefix with the root, or anywhere outside it fails with
/// [`SecurityError::PathTraversal`].
///
/// Leading `/` in the name are ignored, so `/etc/passwd` lands at
/// `root/etc/passwd`. A drive or UNC prefix is rejected outright.
pub fn resolve_entry_target(
    canonical_root: &Path,
    name: &str,
) -> Result<PathBuf, ZipUtilError> {
    let mut joined = canonical_root.to_path_buf();

    for segment in name.split('/') {
        for component in Path::new(segment).components() {
            match component {
                Component::Normal(part) => joined.push(part),
                Component::ParentDir => joined.push(".."),
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) => {
                    return Err(SecurityError::AbsolutePath(name.to_string()).into());
                }
            }
        }
    }

    let canonical = canonicalize_lenient(&joined)?;

    if canonical != canonical_root && canonical.starts_with(canonical_root) {
        Ok(canonical)
    } else {
        Err(SecurityError::PathTraversal(name.to_string()).into())
    }
}

/// Canonicalizes a path whose tail may not exist yet.
///
/// Existing components are resolved against the filesystem, including
/// dangling symlinks whose target is resolved in turn. Once a component is
/// missing the rest is normalized lexically. The returned path never contains
/// `.`, `..` or a symlink that exists at call time.
pub fn canonicalize_lenient(path: &Path) -> io::Result<PathBuf> {
    let mut hops = 0;
    resolve(path, &mut hops)
}

fn resolve(path: &Path, hops: &mut u32) -> io::Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut resolved = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            // `resolved` holds no symlinks, so popping is exact
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(part) => {
                resolved.push(part);
                match fs::symlink_metadata(&resolved) {
                    Ok(meta) if meta.file_type().is_symlink() => {
                        *hops += 1;
                        if *hops > MAX_SYMLINK_HOPS {
                            return Err(io::Error::other(format!(
                                "too many levels of symbolic links: {}",
                                path.display()
                            )));
                        }
                        let target = fs::read_link(&resolved)?;
                        resolved.pop();
                        let next = resolved.join(target);
                        resolved = resolve(&next, hops)?;
                    }
                    Ok(_) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e),
                }
            }
        }
    }

    Ok(resolved)
}
