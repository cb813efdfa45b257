use crate::archivist_core::error::{ArchivistError, Result};
use crate::archivist_core::media::{MediaFile, MediaKind, classify};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Media files found under a source root, split by kind.
#[derive(Debug, Default)]
pub struct Discovered {
    pub photos: Vec<MediaFile>,
    pub videos: Vec<MediaFile>,
}

impl Discovered {
    pub fn len(&self) -> usize {
        self.photos.len() + self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty() && self.videos.is_empty()
    }
}

/// Walk the source root and collect every photo and video beneath it.
///
/// Each path appears at most once per run. Symlinks and non-regular files
/// are skipped silently; unreadable subtrees are logged and skipped. The
/// only fatal condition is a root that is not a readable directory.
pub fn discover(root: &Path) -> Result<Discovered> {
    if !root.is_dir() {
        return Err(ArchivistError::NotADirectory(root.to_path_buf()));
    }
    // Surface an unreadable root before walking; errors below the root are
    // per-entry, not fatal.
    let _ = fs::read_dir(root)?;

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut found = Discovered::default();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let Some(kind) = classify(&path) else {
            log::debug!("Ignoring {}", path.display());
            continue;
        };

        if !seen.insert(path.clone()) {
            continue;
        }

        let file = MediaFile { path, kind };
        match kind {
            MediaKind::Photo => found.photos.push(file),
            MediaKind::Video => found.videos.push(file),
        }
    }

    // Sorted order keeps every later phase deterministic for a fixed tree.
    found.photos.sort_by(|a, b| a.path.cmp(&b.path));
    found.videos.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(found)
}
