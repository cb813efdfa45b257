use crate::archivist_core::error::Result;
use crate::archivist_core::media::MediaFile;
use crate::archivist_core::organize::phase_bar;
use time::PrimitiveDateTime;

/// Outcome of a capture-date lookup for a single file.
#[derive(Debug, Clone, PartialEq)]
pub enum DateLookup {
    Resolved(PrimitiveDateTime),
    /// No usable timestamp; carries the user-facing reason.
    Missing(String),
    /// A timestamp was present but did not have the expected shape.
    Malformed(String),
}

/// Yields capture timestamps for media files, possibly many at a time.
///
/// The returned vec is parallel to `batch`: per-file absence is reported
/// through [`DateLookup`], while `Err` means the source itself failed and
/// aborts the whole resolution phase.
pub trait DateSource {
    fn capture_dates(&mut self, batch: &[MediaFile]) -> Result<Vec<DateLookup>>;
}

/// A media file paired with its authoritative capture timestamp.
#[derive(Debug, Clone)]
pub struct ResolvedMedia {
    pub file: MediaFile,
    pub taken_at: PrimitiveDateTime,
}

/// Resolution output: resolved files plus every file that could not be
/// resolved, each recorded exactly once with its reason.
#[derive(Debug, Default)]
pub struct Resolution {
    pub resolved: Vec<ResolvedMedia>,
    pub failures: Vec<(MediaFile, String)>,
}

impl Resolution {
    pub fn merge(&mut self, other: Resolution) {
        self.resolved.extend(other.resolved);
        self.failures.extend(other.failures);
    }

    pub fn len(&self) -> usize {
        self.resolved.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty() && self.failures.is_empty()
    }
}

/// Resolve photo capture dates through a batched source.
///
/// Batching bounds memory on large card dumps and gives incremental
/// progress; a source error mid-phase is propagated, not swallowed.
pub fn resolve_photos(
    photos: &[MediaFile],
    source: &mut dyn DateSource,
    batch_size: usize,
) -> Result<Resolution> {
    let mut out = Resolution::default();
    if photos.is_empty() {
        return Ok(out);
    }

    let bar = phase_bar(photos.len() as u64, "Extracting EXIF");
    for batch in photos.chunks(batch_size.max(1)) {
        let lookups = source.capture_dates(batch)?;
        record(&mut out, batch, lookups);
        bar.inc(batch.len() as u64);
    }
    bar.finish_with_message("EXIF extraction complete");

    Ok(out)
}

/// Resolve video capture dates one file at a time.
pub fn resolve_videos(videos: &[MediaFile], source: &mut dyn DateSource) -> Result<Resolution> {
    let mut out = Resolution::default();
    if videos.is_empty() {
        return Ok(out);
    }

    let bar = phase_bar(videos.len() as u64, "Probing videos");
    for video in videos {
        let batch = std::slice::from_ref(video);
        let lookups = source.capture_dates(batch)?;
        record(&mut out, batch, lookups);
        bar.inc(1);
    }
    bar.finish_with_message("Video probing complete");

    Ok(out)
}

fn record(out: &mut Resolution, batch: &[MediaFile], lookups: Vec<DateLookup>) {
    debug_assert_eq!(batch.len(), lookups.len());
    for (file, lookup) in batch.iter().zip(lookups) {
        match lookup {
            DateLookup::Resolved(taken_at) => out.resolved.push(ResolvedMedia {
                file: file.clone(),
                taken_at,
            }),
            DateLookup::Missing(reason) | DateLookup::Malformed(reason) => {
                log::debug!("Could not resolve {}: {}", file.path.display(), reason);
                out.failures.push((file.clone(), reason));
            }
        }
    }
}
