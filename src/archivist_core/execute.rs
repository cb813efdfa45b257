use crate::archivist_core::error::{ArchivistError, MoveFailures, Result};
use crate::archivist_core::organize::phase_bar;
use crate::archivist_core::plan::PlannedMove;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Mutex;

/// Aggregate outcome of the execution phase. Exactly one outcome exists per
/// planned move, whatever order the workers finished in.
#[derive(Debug, Default)]
pub struct ExecutionOutcome {
    pub succeeded: usize,
    pub failures: MoveFailures,
}

/// Perform the planned moves on a bounded worker pool.
///
/// Source and destination often sit on different physical volumes, so the
/// pool overlaps I/O latency across `workers` threads. Each failure is
/// recorded against its own source and never aborts a sibling move.
pub fn execute(moves: &[PlannedMove], workers: usize) -> Result<ExecutionOutcome> {
    if moves.is_empty() {
        return Ok(ExecutionOutcome::default());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| ArchivistError::Other(e.to_string()))?;

    let bar = phase_bar(moves.len() as u64, "Moving files");
    let failures = Mutex::new(MoveFailures::new());

    pool.install(|| {
        moves.par_iter().for_each(|mv| {
            if let Err(e) = move_file(&mv.source, &mv.dest) {
                log::warn!("Failed to move {}: {}", mv.source.display(), e);
                failures
                    .lock()
                    .unwrap()
                    .add(mv.source.clone(), mv.dest.clone(), e);
            }
            bar.inc(1);
        });
    });

    bar.finish_with_message("Moves complete");

    let failures = failures.into_inner().unwrap();
    if !failures.is_empty() {
        log::error!("{} files failed to move:\n{}", failures.len(), failures);
    }

    Ok(ExecutionOutcome {
        succeeded: moves.len() - failures.len(),
        failures,
    })
}

/// Move one file, creating its destination directory first.
///
/// Rename when the filesystem allows it. Across devices rename fails, so
/// fall back to copy, verify the copied size, and only then delete the
/// source; a short copy leaves the source untouched.
fn move_file(source: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            let source_len = fs::metadata(source)?.len();
            fs::copy(source, dest)?;

            let dest_len = fs::metadata(dest)?.len();
            if dest_len != source_len {
                let _ = fs::remove_file(dest);
                return Err(io::Error::other(format!(
                    "copy verification failed: source {source_len} bytes, dest {dest_len} bytes"
                )));
            }

            fs::remove_file(source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use std::path::PathBuf;

    fn mv(source: PathBuf, dest: PathBuf) -> PlannedMove {
        PlannedMove { source, dest }
    }

    #[test]
    fn test_execute_moves_into_fresh_directories() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        source.child("IMG_0001.JPG").write_binary(b"jpg bytes").unwrap();

        let moves = vec![mv(
            source.path().join("IMG_0001.JPG"),
            target.path().join("2024/2024-03-15/IMG_0001.JPG"),
        )];

        let outcome = execute(&moves, 2).unwrap();

        assert_eq!(outcome.succeeded, 1);
        assert!(outcome.failures.is_empty());
        assert!(!source.path().join("IMG_0001.JPG").exists());
        let moved = target.path().join("2024/2024-03-15/IMG_0001.JPG");
        assert_eq!(fs::read(moved).unwrap(), b"jpg bytes");
    }

    #[test]
    fn test_one_failure_never_aborts_siblings() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        source.child("ok_a.jpg").write_binary(b"a").unwrap();
        source.child("ok_b.jpg").write_binary(b"b").unwrap();

        let moves = vec![
            mv(source.path().join("ok_a.jpg"), target.path().join("d/ok_a.jpg")),
            // Source vanished between planning and execution.
            mv(
                source.path().join("gone.jpg"),
                target.path().join("d/gone.jpg"),
            ),
            mv(source.path().join("ok_b.jpg"), target.path().join("d/ok_b.jpg")),
        ];

        let outcome = execute(&moves, 4).unwrap();

        assert_eq!(outcome.succeeded, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(
            outcome.failures.failures[0].source,
            source.path().join("gone.jpg")
        );
        assert!(target.path().join("d/ok_a.jpg").exists());
        assert!(target.path().join("d/ok_b.jpg").exists());
    }

    #[test]
    fn test_execute_empty_plan() {
        let outcome = execute(&[], 8).unwrap();
        assert_eq!(outcome.succeeded, 0);
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn test_single_worker_still_completes_everything() {
        let source = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        for i in 0..5 {
            source
                .child(format!("f{i}.jpg"))
                .write_binary(format!("file {i}").as_bytes())
                .unwrap();
        }

        let moves: Vec<PlannedMove> = (0..5)
            .map(|i| {
                mv(
                    source.path().join(format!("f{i}.jpg")),
                    target.path().join(format!("2024/2024-01-01/f{i}.jpg")),
                )
            })
            .collect();

        let outcome = execute(&moves, 1).unwrap();
        assert_eq!(outcome.succeeded, 5);
    }

    #[test]
    fn test_move_file_overwrites_nothing_on_short_copy() {
        // Plain rename path: destination directory already present.
        let temp = TempDir::new().unwrap();
        temp.child("src.jpg").write_binary(b"payload").unwrap();
        temp.child("out").create_dir_all().unwrap();

        move_file(&temp.path().join("src.jpg"), &temp.path().join("out/dst.jpg")).unwrap();

        assert!(!temp.path().join("src.jpg").exists());
        assert!(temp.path().join("out/dst.jpg").exists());
    }
}
