use crate::archivist_core::media::MediaFile;
use crate::archivist_core::resolve::ResolvedMedia;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use time::PrimitiveDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

/// Year directory segment.
const YEAR_FORMAT: &[FormatItem] = format_description!("[year]");

/// Day directory segment.
const DAY_FORMAT: &[FormatItem] = format_description!("[year]-[month]-[day]");

const COMPARE_CHUNK: usize = 64 * 1024;

/// One source file and the destination computed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// The complete set of intended actions for a run, computed before any
/// mutation happens. Duplicates are sources whose destination already holds
/// identical bytes; they are reported, never moved.
#[derive(Debug, Default)]
pub struct Plan {
    pub moves: Vec<PlannedMove>,
    pub duplicates: Vec<PlannedMove>,
    pub errors: Vec<(MediaFile, String)>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.moves.len() + self.duplicates.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Options governing conflict classification.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanOptions {
    pub group_by_extension: bool,
    pub check_duplicates: bool,
    pub overwrite: bool,
}

/// Compute the canonical destination for a file and its capture date:
/// `root/YYYY/YYYY-MM-DD/[ext/]filename`.
///
/// Pure in its inputs, so a re-run over the same tree recomputes identical
/// destinations.
pub fn target_path(
    file: &MediaFile,
    taken_at: PrimitiveDateTime,
    target_root: &Path,
    group_by_extension: bool,
) -> PathBuf {
    let year = taken_at.format(YEAR_FORMAT).unwrap();
    let day = taken_at.format(DAY_FORMAT).unwrap();

    let mut dir = target_root.join(year).join(day);
    if group_by_extension {
        dir = dir.join(file.extension_lowercase());
    }

    dir.join(file.file_name())
}

enum Conflict {
    None,
    Duplicate,
    Error(String),
}

/// Classify every resolved file into exactly one planned action.
pub fn plan(resolved: &[ResolvedMedia], target_root: &Path, opts: PlanOptions) -> Plan {
    let mut out = Plan::default();
    let mut claimed: HashSet<PathBuf> = HashSet::new();

    for item in resolved {
        let dest = target_path(&item.file, item.taken_at, target_root, opts.group_by_extension);

        // Two sources shot on the same day can carry the same filename and
        // land on the same destination. Workers require every
        // (source, destination) pair to be disjoint, so only the first
        // claim may move, whatever the conflict mode.
        if !claimed.insert(dest.clone()) {
            out.errors.push((
                item.file.clone(),
                format!(
                    "destination {} already claimed by another planned move",
                    dest.display()
                ),
            ));
            continue;
        }

        if opts.overwrite {
            out.moves.push(PlannedMove {
                source: item.file.path.clone(),
                dest,
            });
            continue;
        }

        match classify_conflict(&item.file.path, &dest, opts.check_duplicates) {
            Ok(Conflict::None) => out.moves.push(PlannedMove {
                source: item.file.path.clone(),
                dest,
            }),
            Ok(Conflict::Duplicate) => out.duplicates.push(PlannedMove {
                source: item.file.path.clone(),
                dest,
            }),
            Ok(Conflict::Error(reason)) => out.errors.push((item.file.clone(), reason)),
            Err(e) => out.errors.push((
                item.file.clone(),
                format!("could not compare with {}: {}", dest.display(), e),
            )),
        }
    }

    out
}

/// Classify a single candidate destination against the filesystem.
///
/// An existing target is never overwritten here: identical content (when
/// checking is enabled) downgrades to a duplicate, everything else is an
/// error for the operator to resolve.
fn classify_conflict(source: &Path, dest: &Path, check_duplicates: bool) -> io::Result<Conflict> {
    if let Some(parent) = dest.parent() {
        if parent.is_file() {
            return Ok(Conflict::Error(format!(
                "target directory {} is a file",
                parent.display()
            )));
        }
    }

    if dest.is_file() {
        if check_duplicates {
            if files_identical(source, dest)? {
                return Ok(Conflict::Duplicate);
            }
            return Ok(Conflict::Error(format!(
                "target {} exists with different contents",
                dest.display()
            )));
        }
        return Ok(Conflict::Error(format!(
            "target {} already exists",
            dest.display()
        )));
    }

    Ok(Conflict::None)
}

/// Full byte-for-byte comparison of two files. Lengths are checked first,
/// then both files are streamed in fixed-size chunks.
pub fn files_identical(a: &Path, b: &Path) -> io::Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(File::open(a)?);
    let mut reader_b = BufReader::new(File::open(b)?);
    let mut buf_a = vec![0u8; COMPARE_CHUNK];
    let mut buf_b = vec![0u8; COMPARE_CHUNK];

    loop {
        let len_a = read_full(&mut reader_a, &mut buf_a)?;
        let len_b = read_full(&mut reader_b, &mut buf_b)?;
        if len_a != len_b || buf_a[..len_a] != buf_b[..len_b] {
            return Ok(false);
        }
        if len_a == 0 {
            return Ok(true);
        }
    }
}

/// Fill as much of `buf` as the reader can provide before EOF.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
