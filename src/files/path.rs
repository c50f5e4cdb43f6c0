//! Maps a request target onto a file under `<root>/webdir/<username>/`.
//!
//! Traversal is neutralised by deleting every literal `../` from the joined
//! path until none is left. The client is never told that anything was
//! removed.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::auth::session::is_safe_username;
use crate::util::truncate_utf8;

/// Longest remainder, in bytes, kept from a request target.
pub const MAX_FNAME_LEN: usize = 256;

pub const WEBDIR: &str = "webdir";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("username {0:?} cannot name a directory")]
    UnsafeUsername(String),

    #[error("server root {0:?} must be UTF-8 and free of '..'")]
    UnsafeRoot(PathBuf),
}

/// A path that lies under one user's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxedPath {
    user_dir: PathBuf,
    path: PathBuf,
}

impl SandboxedPath {
    /// `<root>/webdir/<username>`
    pub fn user_dir(&self) -> &Path {
        &self.user_dir
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// True when nothing is left after the last `/`, as for `/` or `/a/..`.
    pub fn names_directory(&self) -> bool {
        self.path.as_os_str().as_encoded_bytes().ends_with(b"/")
    }

    /// Directories between the user directory and the file, outermost first.
    pub fn intermediate_dirs(&self) -> Vec<PathBuf> {
        let Ok(relative) = self.path.strip_prefix(&self.user_dir) else {
            return Vec::new();
        };
        let Some(parent) = relative.parent() else {
            return Vec::new();
        };

        let mut current = self.user_dir.clone();
        let mut dirs = Vec::new();
        for component in parent.components() {
            if let Component::Normal(segment) = component {
                current.push(segment);
                dirs.push(current.clone());
            }
        }
        dirs
    }
}

/// Resolves `target` for `username` below `root`.
///
/// # Example
///
/// ```
/// # use std::path::Path;
/// # use cubby::files::path::resolve;
/// let p = resolve(Path::new("/srv"), "bob", "/bob/../../etc/passwd").unwrap();
/// assert_eq!(p.as_path(), Path::new("/srv/webdir/bob/etc/passwd"));
/// ```
pub fn resolve(root: &Path, username: &str, target: &str) -> Result<SandboxedPath, ResolveError> {
    if !is_safe_username(username) {
        return Err(ResolveError::UnsafeUsername(username.to_string()));
    }
    let root_str = match root.to_str() {
        Some(s) if !s.contains("..") => s,
        _ => return Err(ResolveError::UnsafeRoot(root.to_path_buf())),
    };

    let user_dir = format!("{}/{}/{}", root_str.trim_end_matches('/'), WEBDIR, username);
    let prefix = format!("{}/", user_dir);

    let mut remainder = target.strip_prefix('/').unwrap_or(target);
    if let Some(rest) = remainder
        .strip_prefix(username)
        .and_then(|r| r.strip_prefix('/'))
    {
        remainder = rest;
    }
    let remainder = truncate_utf8(remainder, MAX_FNAME_LEN);

    let mut full = format!("{}{}", prefix, remainder);
    strip_traversal(&mut full);

    // The prefix ends in '/' and holds no "..", so no deletion can reach it.
    debug_assert!(full.starts_with(&prefix));

    Ok(SandboxedPath {
        user_dir: PathBuf::from(user_dir),
        path: PathBuf::from(full),
    })
}

/// Deletes `../` until none is left, then drops a dangling final `..`.
pub fn strip_traversal(path: &mut String) {
    while let Some(at) = path.find("../") {
        path.replace_range(at..at + 3, "");
    }
    if path.ends_with("/..") {
        path.truncate(path.len() - 2);
    }
}
