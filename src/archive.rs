use std::path::{Path, PathBuf};

use crate::error::ArchiveError;

/// Create a directory if it is absent.
///
/// Single-level create only: a missing parent is an error, so call sites
/// create the download root and the podcast directory one level at a
/// time rather than relying on a recursive mkdir.
pub fn ensure_directory(path: &Path) -> Result<(), ArchiveError> {
    if path.is_dir() {
        return Ok(());
    }

    std::fs::create_dir(path).map_err(|e| ArchiveError::CreateDirectoryFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Whether the episode at `path` still needs to be downloaded.
///
/// Existence of the file is the only completeness signal; a zero-byte or
/// truncated file from an interrupted run counts as already archived.
pub fn should_download(path: &Path) -> bool {
    !path.exists()
}

/// Target path for an episode: `root/title/filename`.
///
/// The podcast title is used verbatim as a path segment. Titles come
/// from the local config file rather than from feed content and are
/// trusted to be path-safe; a title containing separators will escape
/// the root.
pub fn episode_path(root: &Path, title: &str, filename: &str) -> PathBuf {
    root.join(title).join(filename)
}
