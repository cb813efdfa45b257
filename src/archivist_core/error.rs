use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchivistError {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Filesystem errors
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // Metadata errors
    #[error("Exiftool error: {0}")]
    ExifTool(String),

    // User interaction
    #[error("Operation cancelled by user")]
    Cancelled,

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Details about files that failed to move.
#[derive(Debug, Default)]
pub struct MoveFailures {
    pub failures: Vec<MoveFailure>,
}

#[derive(Debug)]
pub struct MoveFailure {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub error: std::io::Error,
}

impl std::fmt::Display for MoveFailures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for failure in &self.failures {
            writeln!(
                f,
                "  {} -> {}: {}",
                failure.source.display(),
                failure.destination.display(),
                failure.error
            )?;
        }
        Ok(())
    }
}

impl MoveFailures {
    pub fn new() -> Self {
        Self { failures: Vec::new() }
    }

    pub fn add(&mut self, source: PathBuf, destination: PathBuf, error: std::io::Error) {
        self.failures.push(MoveFailure {
            source,
            destination,
            error,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

/// Result type for archivist operations.
pub type Result<T> = std::result::Result<T, ArchivistError>;
