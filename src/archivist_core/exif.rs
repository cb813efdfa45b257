use crate::archivist_core::error::{ArchivistError, Result};
use crate::archivist_core::media::MediaFile;
use crate::archivist_core::resolve::{DateLookup, DateSource};
use exiftool::ExifTool;
use serde::Deserialize;
use time::PrimitiveDateTime;

/// Date format used in EXIF data.
pub const EXIF_DATE_FORMAT: &[time::format_description::FormatItem] =
    time::macros::format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// The one exiftool field the organizer cares about. Everything else in the
/// tool's output is ignored.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct RawDateInfo {
    #[serde(default)]
    date_time_original: String,
}

/// Photo capture dates read through a persistent exiftool process.
pub struct ExifDateSource {
    exiftool: ExifTool,
}

impl ExifDateSource {
    /// Start the exiftool process. A tool that cannot start is fatal to the
    /// whole photo-resolution phase, so this is surfaced immediately.
    pub fn new() -> Result<Self> {
        let exiftool =
            ExifTool::new().map_err(|e| ArchivistError::ExifTool(e.to_string()))?;
        Ok(Self { exiftool })
    }
}

impl DateSource for ExifDateSource {
    fn capture_dates(&mut self, batch: &[MediaFile]) -> Result<Vec<DateLookup>> {
        let mut lookups = Vec::with_capacity(batch.len());
        for file in batch {
            let raw: RawDateInfo = self
                .exiftool
                .read_metadata(&file.path, &[])
                .map_err(|e| ArchivistError::ExifTool(e.to_string()))?;
            lookups.push(parse_exif_date(&raw.date_time_original));
        }
        Ok(lookups)
    }
}

/// Classify a DateTimeOriginal value. An absent field and a present-but-odd
/// value are different failures; only an exact `YYYY:MM:DD HH:MM:SS` clock
/// value resolves.
pub(crate) fn parse_exif_date(value: &str) -> DateLookup {
    if value.is_empty() {
        return DateLookup::Missing("No EXIF:DateTimeOriginal found".to_string());
    }
    match PrimitiveDateTime::parse(value, EXIF_DATE_FORMAT) {
        Ok(taken_at) => DateLookup::Resolved(taken_at),
        Err(_) => DateLookup::Malformed(format!("Unexpected date format: {value}")),
    }
}
