//! Removal of everything below a directory.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

// Contents come before their directory, and symlinks are never followed, so
// a link to a directory is unlinked instead of descended.
fn entries(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .into_iter()
}

fn remove_entry(entry: &DirEntry) -> Result<()> {
    let path = entry.path();
    log::debug!("Removing {}...", path.display());
    if entry.file_type().is_dir() {
        fs::remove_dir(path).map_err(Error::io(path))
    } else {
        fs::remove_file(path).map_err(Error::io(path))
    }
}

fn walk_error(dir: &Path, error: walkdir::Error) -> Error {
    let path = error.path().unwrap_or(dir).to_path_buf();
    Error::Io {
        path,
        source: io::Error::from(error),
    }
}

/// Delete every entry below `dir`, leaving `dir` itself in place.
///
/// Stops at the first failure.
pub(crate) fn clear_dir(dir: &Path) -> Result<()> {
    for entry in entries(dir) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        remove_entry(&entry)?;
    }
    Ok(())
}

/// Best-effort variant of [`clear_dir`]: failures are logged and skipped.
pub(crate) fn scrub_dir(dir: &Path) {
    for entry in entries(dir) {
        let removed = entry
            .map_err(|e| walk_error(dir, e))
            .and_then(|entry| remove_entry(&entry));
        if let Err(error) = removed {
            log::warn!("Failed to clean up under {}: {}", dir.display(), error);
        }
    }
}

pub(crate) fn is_empty_dir(dir: &Path) -> Result<bool> {
    let mut listing = fs::read_dir(dir).map_err(Error::io(dir))?;
    Ok(listing.next().is_none())
}
