use clap::Parser;
use simplelog::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Organize photos and videos by capture date")]
pub struct Cli {
    /// Source directory containing media files
    pub source: PathBuf,

    /// Target directory for organized files
    pub target: PathBuf,

    /// Show what would be done without moving files
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Group files by extension within date folders
    #[arg(long)]
    pub ext: bool,

    /// Number of photos to process per metadata batch
    #[arg(long, default_value_t = 50)]
    pub batch_size: usize,

    /// Skip checking for immutable flags on source files
    #[arg(long)]
    pub skip_flag_check: bool,

    /// Compare colliding targets byte-for-byte and skip identical sources
    #[arg(long)]
    pub check_duplicates: bool,

    /// Move onto existing targets without any conflict checks
    #[arg(long)]
    pub overwrite: bool,

    /// Number of parallel move workers
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Enable file logging to archivist.log
    #[arg(long)]
    pub log: bool,

    /// Log level for file logging (debug, info, warn, error)
    #[arg(long, default_value_t = LevelFilter::Debug)]
    pub log_level: LevelFilter,
}
