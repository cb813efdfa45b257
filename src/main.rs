use anyhow::Result;
use archivist::archivist_core::organize::{OrganizeConfig, organize};
use archivist::archivist_core::{ArchivistError, Cli};
use clap::Parser;
use simplelog::{CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, WriteLogger};
use std::fs::File;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize loggers
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Warn,
        Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )];

    if cli.log {
        loggers.push(WriteLogger::new(
            cli.log_level,
            Config::default(),
            File::create("archivist.log")?,
        ));
    }

    CombinedLogger::init(loggers)?;

    let config = OrganizeConfig {
        source: cli.source,
        target: cli.target,
        dry_run: cli.dry_run,
        group_by_extension: cli.ext,
        batch_size: cli.batch_size,
        skip_flag_check: cli.skip_flag_check,
        check_duplicates: cli.check_duplicates,
        overwrite: cli.overwrite,
        workers: cli.workers,
    };

    match organize(&config) {
        Ok(summary) => {
            if !summary.is_clean() {
                std::process::exit(1);
            }
            Ok(())
        }
        // Declining the immutable-flag prompt is a clean abort, not an error.
        Err(ArchivistError::Cancelled) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
