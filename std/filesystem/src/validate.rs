//! Path validation for the file manager.
//!
//! All filesystem operations must pass through [`resolve_path`] to ensure
//! the requested path stays inside the protected directory.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from path validation.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// The path resolves outside the protected directory.
    #[error("Access denied: path outside protected directory: {0}")]
    NotAllowed(PathBuf),
    /// The path contains a null byte.
    #[error("path contains null byte")]
    NullByte,
    /// The protected directory is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
    /// An I/O error occurred during path resolution.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Canonicalize the protected directory, which must already exist.
pub fn canonicalize_root(root: &Path) -> Result<PathBuf, ValidateError> {
    let canonical = root.canonicalize()?;
    if !canonical.is_dir() {
        return Err(ValidateError::NotADirectory(canonical));
    }
    Ok(canonical)
}

/// Resolve `path` against the protected directory `root`.
///
/// Steps:
/// 1. Reject paths containing null bytes
/// 2. Join the path onto `root` (an absolute path replaces it)
/// 3. Canonicalize the deepest ancestor that exists (symlinks included, even
///    dangling ones), then re-append the missing trailing segments
/// 4. Verify the result starts with `root`
///
/// `root` must already be canonical.
pub fn resolve_path(path: &str, root: &Path) -> Result<PathBuf, ValidateError> {
    if path.contains('\0') {
        return Err(ValidateError::NullByte);
    }

    let joined = root.join(path);
    let mut existing = joined.as_path();
    let mut missing: Vec<OsString> = Vec::new();
    // A dangling symlink counts as existing so canonicalize rejects it.
    while existing.symlink_metadata().is_err() {
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_owned());
                existing = parent;
            }
            _ => {
                return Err(ValidateError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "cannot resolve path",
                )));
            }
        }
    }

    let mut canonical = existing.canonicalize()?;
    for name in missing.iter().rev() {
        canonical.push(name);
    }

    if !canonical.starts_with(root) {
        return Err(ValidateError::NotAllowed(canonical));
    }

    Ok(canonical)
}
