use std::path::{Path, PathBuf};

/// Photo file extensions (lowercase) eligible for organizing.
const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "arw", "sr2", "raf"];

/// Video file extensions (lowercase) eligible for organizing.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photo,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A media file found under the source root. Identity is the source path;
/// nothing about it changes after discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaFile {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    pub fn extension_lowercase(&self) -> String {
        self.path
            .extension()
            .unwrap_or_default()
            .to_string_lossy()
            .to_lowercase()
    }
}

/// Classify a path against the extension allow-lists, case-insensitively.
/// Anything else is ignored by discovery.
pub fn classify(path: &Path) -> Option<MediaKind> {
    let ext = path.extension().and_then(|e| e.to_str())?.to_lowercase();

    if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
        return Some(MediaKind::Photo);
    }
    if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        return Some(MediaKind::Video);
    }

    None
}
