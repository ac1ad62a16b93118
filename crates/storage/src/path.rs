//! Path validation and joining utilities.
//!
//! [`validate`] turns a storage uri into a safe object key and prevents
//! path traversal. [`join`] and [`parent`] work on plain `/`-separated
//! strings with POSIX semantics, independent of the host platform, since
//! storage paths are never OS paths.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Validates a storage path for security and correctness.
/// Ensures that paths don't escape the storage root (no `..` traversal).
///
/// > **Note:** This does **not** normalize backslashes, non-UTF8 bytes, or
/// >           platform-specific weirdness. Null bytes are explicitly rejected.
///
/// # Returns
/// Returns the normalized path if valid, or [`InvalidPath`](crate::error::ErrorKind::InvalidPath)
/// if invalid.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use stash_storage::validate_path;
/// // Valid paths
/// assert!(validate_path("assets/folder1/example.txt").is_ok());
/// assert!(validate_path("/public/banner.png").is_ok()); // (root is stripped)
/// assert!(validate_path("a/../file.txt").is_ok()); // (never leaves storage root)
/// // Invalid paths
/// assert!(validate_path("../etc/passwd").is_err());
/// assert!(validate_path("a/../../b").is_err()); // (leaves storage root)
/// assert!(validate_path("a\0b").is_err());
/// // Paths get resolved
/// assert_eq!(
///     validate_path("wrong/../still-wrong/.././correct//./file.txt/").unwrap(),
///     Path::new("correct/file.txt")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                // Null bytes pass through Path::components() on Unix but cause
                // truncation in C-based syscalls; reject them explicitly.
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            },
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

/// Validate a storage uri and render it as a `/`-separated object key.
pub(crate) fn object_key(uri: &str) -> Result<String> {
    let validated = validate(uri)?;
    Ok(validated.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/"))
}

/// Join two `/`-separated paths and normalize the result.
///
/// Empty arguments are ignored, `.` segments and repeated slashes are dropped
/// and `..` segments are resolved where possible. A leading and a trailing
/// slash are preserved. Joining nothing yields `"."`.
///
/// ```
/// use stash_storage::path::join;
/// assert_eq!(join("assets", "folderA/nested.txt"), "assets/folderA/nested.txt");
/// assert_eq!(join("", "example.txt"), "example.txt");
/// assert_eq!(join("/public/", "./banner.png"), "/public/banner.png");
/// ```
pub fn join(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, true) => ".".to_string(),
        (true, false) => normalize(path),
        (false, true) => normalize(base),
        (false, false) => normalize(&format!("{base}/{path}")),
    }
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {},
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                },
                // Relative paths keep leading `..`; `/..` is just `/`.
                _ if !absolute => segments.push(".."),
                _ => {},
            },
            s => segments.push(s),
        }
    }
    let mut normalized = segments.join("/");
    if normalized.is_empty() && !absolute {
        normalized.push('.');
    }
    if trailing && !normalized.is_empty() {
        normalized.push('/');
    }
    match absolute {
        true => format!("/{normalized}"),
        false => normalized,
    }
}

/// The directory portion of a `/`-separated path (POSIX `dirname`).
///
/// Top-level names have the parent `"."`.
///
/// ```
/// use stash_storage::path::parent;
/// assert_eq!(parent("folder1/example.txt"), "folder1");
/// assert_eq!(parent("example.txt"), ".");
/// ```
pub fn parent(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return match path.starts_with('/') {
            true => "/",
            false => ".",
        };
    }
    match trimmed.rfind('/') {
        None => ".",
        Some(idx) => match trimmed[..idx].trim_end_matches('/') {
            "" => "/",
            dir => dir,
        },
    }
}
