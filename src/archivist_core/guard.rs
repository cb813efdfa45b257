use crate::archivist_core::error::Result;
use crate::archivist_core::media::MediaFile;
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

/// Probe at most this many files when the tree is large.
const SAMPLE_SIZE: usize = 100;
const SAMPLE_THRESHOLD: usize = 1000;

/// Wall-clock ceiling for the probe. This is a pre-flight convenience
/// check, so running out of time degrades to "none found" rather than
/// stalling the run.
const PROBE_DEADLINE: Duration = Duration::from_secs(5);

/// Check whether any source file carries a platform immutability flag
/// (macOS `uchg`/`schg`) that would make moves fail en masse. Platforms
/// without such flags report false.
pub fn has_immutable_files(files: &[&MediaFile]) -> bool {
    let sample = if files.len() > SAMPLE_THRESHOLD {
        &files[..SAMPLE_SIZE]
    } else {
        files
    };

    let deadline = Instant::now() + PROBE_DEADLINE;
    for file in sample {
        if Instant::now() >= deadline {
            log::warn!("Immutable-flag probe hit its deadline, continuing without a full scan");
            return false;
        }
        if is_immutable(&file.path) {
            return true;
        }
    }

    false
}

#[cfg(target_os = "macos")]
fn is_immutable(path: &Path) -> bool {
    use std::os::macos::fs::MetadataExt;

    // stat(2) st_flags bits: UF_IMMUTABLE is the user `uchg` flag,
    // SF_IMMUTABLE the superuser `schg` flag.
    const UF_IMMUTABLE: u32 = 0x0000_0002;
    const SF_IMMUTABLE: u32 = 0x0002_0000;

    match std::fs::metadata(path) {
        Ok(meta) => meta.st_flags() & (UF_IMMUTABLE | SF_IMMUTABLE) != 0,
        Err(_) => false,
    }
}

#[cfg(not(target_os = "macos"))]
fn is_immutable(_path: &Path) -> bool {
    false
}

/// Ask the operator whether to proceed despite immutable flags. Returns
/// false when they decline.
pub fn confirm_continue(source: &Path) -> Result<bool> {
    println!("\nWarning: found files with immutable flags (uchg)");
    println!("These files cannot be moved until the flags are removed.");
    println!("\nTo fix, run:");
    println!("  sudo chflags -R nouchg {}", source.display());
    println!();
    print!("Continue anyway? [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
