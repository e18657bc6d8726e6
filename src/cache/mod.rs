//! Package cache maintenance.
//!
//! pacman keeps downloaded packages in its cache, and the bundler picks
//! packages from there. The cache is emptied before each architecture so one
//! bundle never sees the other architecture's packages.

use crate::error::{LaunchError, Result};
use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use tokio::fs;

/// Kind of a cache directory entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Dir,
    /// Symbolic link (never followed)
    Symlink,
    /// Anything else (sockets, fifos)
    Other,
}

/// One entry of a cache listing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CacheEntry {
    /// File name within the cache directory
    pub name: OsString,
    /// What the entry is
    pub kind: EntryKind,
    /// Size in bytes as reported by the filesystem
    pub size: u64,
}

impl fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.kind {
            EntryKind::File => '-',
            EntryKind::Dir => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::Other => '?',
        };
        write!(f, "{marker} {:>12} {}", self.size, self.name.to_string_lossy())
    }
}

fn cache_error(path: &Path) -> impl FnOnce(io::Error) -> LaunchError + '_ {
    move |source| LaunchError::Cache {
        path: path.to_path_buf(),
        source,
    }
}

/// Removes every entry inside `dir`, keeping `dir` itself.
///
/// Returns the number of entries removed. A missing directory is an error.
pub async fn clear_contents(dir: &Path) -> Result<usize> {
    let mut entries = fs::read_dir(dir).await.map_err(cache_error(dir))?;
    let mut removed = 0;

    while let Some(entry) = entries.next_entry().await.map_err(cache_error(dir))? {
        let path = entry.path();
        let file_type = entry.file_type().await.map_err(cache_error(&path))?;

        let result = if file_type.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };

        match result {
            Ok(()) => removed += 1,
            // Removed concurrently by something else; the goal is reached anyway
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(cache_error(&path)(e)),
        }
    }

    log::debug!("Removed {removed} entries from {}", dir.display());
    Ok(removed)
}

/// Lists the entries of `dir`, sorted by name.
pub async fn list(dir: &Path) -> Result<Vec<CacheEntry>> {
    let mut entries = fs::read_dir(dir).await.map_err(cache_error(dir))?;
    let mut listing = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(cache_error(dir))? {
        let path = entry.path();
        let metadata = fs::symlink_metadata(&path)
            .await
            .map_err(cache_error(&path))?;
        let file_type = metadata.file_type();

        let kind = if file_type.is_symlink() {
            EntryKind::Symlink
        } else if file_type.is_dir() {
            EntryKind::Dir
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        listing.push(CacheEntry {
            name: entry.file_name(),
            kind,
            size: metadata.len(),
        });
    }

    listing.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(listing)
}
