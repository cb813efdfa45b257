use crate::archivist_core::error::Result;
use crate::archivist_core::media::MediaFile;
use crate::archivist_core::resolve::{DateLookup, DateSource};
use std::path::Path;
use std::process::Command;
use time::format_description::FormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

/// creation_time values with no zone designator.
const PLAIN_FORMAT: &[FormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

const PLAIN_SUBSEC_FORMAT: &[FormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

/// Video capture dates scraped from ffmpeg's diagnostic output, one
/// external invocation per file.
pub struct FfmpegDateSource;

impl DateSource for FfmpegDateSource {
    fn capture_dates(&mut self, batch: &[MediaFile]) -> Result<Vec<DateLookup>> {
        Ok(batch.iter().map(|file| probe_creation_time(&file.path)).collect())
    }
}

/// Ask ffmpeg to dump container metadata and pull the creation time out of
/// its diagnostics. ffmpeg prints these to stderr and exits non-zero when
/// given no output file, so the exit status is deliberately not checked.
/// Any failure here, including a missing ffmpeg binary, stays per-file.
pub fn probe_creation_time(path: &Path) -> DateLookup {
    let output = Command::new("ffmpeg").arg("-i").arg(path).arg("-dump").output();

    match output {
        Ok(out) => scrape_creation_time(&String::from_utf8_lossy(&out.stderr)),
        Err(e) => {
            log::warn!("ffmpeg probe failed for {}: {}", path.display(), e);
            DateLookup::Missing(format!("ffmpeg probe failed: {e}"))
        }
    }
}

/// Find the first `creation_time`-labeled line and parse its last token.
fn scrape_creation_time(diagnostics: &str) -> DateLookup {
    for line in diagnostics.lines() {
        if !line.contains("creation_time") {
            continue;
        }
        let Some(value) = line.split_whitespace().last() else {
            continue;
        };
        return parse_creation_time(value);
    }
    DateLookup::Missing("No creation_time found".to_string())
}

/// Parse an ISO-8601 creation time, keeping the clock value exactly as
/// written. Containers emit it with or without sub-seconds and with or
/// without a UTC designator, so this tries the zoned form first and falls
/// back to the plain ones.
pub(crate) fn parse_creation_time(value: &str) -> DateLookup {
    if let Ok(taken_at) = OffsetDateTime::parse(value, &Rfc3339) {
        return DateLookup::Resolved(PrimitiveDateTime::new(taken_at.date(), taken_at.time()));
    }
    if let Ok(taken_at) = PrimitiveDateTime::parse(value, PLAIN_FORMAT) {
        return DateLookup::Resolved(taken_at);
    }
    match PrimitiveDateTime::parse(value, PLAIN_SUBSEC_FORMAT) {
        Ok(taken_at) => DateLookup::Resolved(taken_at),
        Err(_) => DateLookup::Malformed(format!("Unparsable creation_time: {value}")),
    }
}
