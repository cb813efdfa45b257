use crate::archivist_core::discover::discover;
use crate::archivist_core::error::{ArchivistError, Result};
use crate::archivist_core::execute::execute;
use crate::archivist_core::exif::ExifDateSource;
use crate::archivist_core::guard;
use crate::archivist_core::media::MediaFile;
use crate::archivist_core::plan::{Plan, PlanOptions, plan};
use crate::archivist_core::resolve::{Resolution, resolve_photos, resolve_videos};
use crate::archivist_core::video::FfmpegDateSource;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

const DRY_RUN_MOVE_PREVIEW: usize = 10;
const DRY_RUN_DUPLICATE_PREVIEW: usize = 5;

/// Options for a single organize run, straight off the CLI.
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    pub source: PathBuf,
    pub target: PathBuf,
    pub dry_run: bool,
    pub group_by_extension: bool,
    pub batch_size: usize,
    pub skip_flag_check: bool,
    pub check_duplicates: bool,
    pub overwrite: bool,
    pub workers: usize,
}

/// Aggregated result of a run; the caller derives the exit status from it.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub moved: usize,
    pub duplicates: usize,
    pub errors: Vec<(PathBuf, String)>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub(crate) fn phase_bar(len: u64, msg: &'static str) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
        .unwrap();
    let bar = ProgressBar::new(len).with_style(style);
    bar.set_message(msg);
    bar
}

/// Run the whole pipeline: discover, resolve, plan, then either preview the
/// plan (dry run) or execute it. All mutation happens strictly after the
/// plan is complete.
pub fn organize(cfg: &OrganizeConfig) -> Result<RunSummary> {
    if !cfg.source.is_dir() {
        return Err(ArchivistError::NotADirectory(cfg.source.clone()));
    }
    if !cfg.target.is_dir() {
        return Err(ArchivistError::NotADirectory(cfg.target.clone()));
    }

    println!("Discovering files in {}...", cfg.source.display());
    let discovered = discover(&cfg.source)?;
    println!(
        "Found {} photos, {} videos",
        discovered.photos.len(),
        discovered.videos.len()
    );

    if !cfg.skip_flag_check && !discovered.is_empty() {
        let all: Vec<&MediaFile> = discovered
            .photos
            .iter()
            .chain(discovered.videos.iter())
            .collect();
        if guard::has_immutable_files(&all) && !guard::confirm_continue(&cfg.source)? {
            println!("Aborted.");
            return Err(ArchivistError::Cancelled);
        }
    }

    let mut resolution = Resolution::default();
    if !discovered.photos.is_empty() {
        // Only start the external tool when there is photo work for it.
        let mut photo_source = ExifDateSource::new()?;
        resolution.merge(resolve_photos(
            &discovered.photos,
            &mut photo_source,
            cfg.batch_size,
        )?);
    }
    if !discovered.videos.is_empty() {
        let mut video_source = FfmpegDateSource;
        resolution.merge(resolve_videos(&discovered.videos, &mut video_source)?);
    }

    let opts = PlanOptions {
        group_by_extension: cfg.group_by_extension,
        check_duplicates: cfg.check_duplicates,
        overwrite: cfg.overwrite,
    };
    let plan = plan(&resolution.resolved, &cfg.target, opts);

    println!("\nPlanned operations:");
    println!("  Moves: {}", plan.moves.len());
    println!("  Duplicates (can delete): {}", plan.duplicates.len());
    println!(
        "  Errors: {}",
        plan.errors.len() + resolution.failures.len()
    );

    let mut summary = RunSummary {
        duplicates: plan.duplicates.len(),
        ..Default::default()
    };
    for (file, reason) in resolution.failures {
        summary.errors.push((file.path, reason));
    }
    for (file, reason) in &plan.errors {
        summary.errors.push((file.path.clone(), reason.clone()));
    }

    if cfg.dry_run {
        preview(&plan);
    } else {
        let outcome = execute(&plan.moves, cfg.workers)?;
        summary.moved = outcome.succeeded;

        if outcome.failures.is_empty() && !plan.moves.is_empty() {
            println!("All moves completed successfully!");
        }
        for failure in outcome.failures.failures {
            summary
                .errors
                .push((failure.source, failure.error.to_string()));
        }

        if !plan.duplicates.is_empty() {
            println!(
                "\nFound {} duplicate files (can be deleted):",
                plan.duplicates.len()
            );
            for duplicate in &plan.duplicates {
                println!("  {}", duplicate.source.display());
            }
        }
    }

    if !summary.errors.is_empty() {
        eprintln!("\nEncountered {} errors:", summary.errors.len());
        for (path, reason) in &summary.errors {
            eprintln!("  {}: {}", path.display(), reason);
        }
    }

    Ok(summary)
}

/// Show the head of each plan category without touching the filesystem.
fn preview(plan: &Plan) {
    println!("\nDry run mode - showing first {} moves:", DRY_RUN_MOVE_PREVIEW);
    for mv in plan.moves.iter().take(DRY_RUN_MOVE_PREVIEW) {
        println!("  {} -> {}", mv.source.display(), mv.dest.display());
    }
    if plan.moves.len() > DRY_RUN_MOVE_PREVIEW {
        println!("  ... and {} more", plan.moves.len() - DRY_RUN_MOVE_PREVIEW);
    }

    if !plan.duplicates.is_empty() {
        println!("\nDuplicates (can delete source):");
        for duplicate in plan.duplicates.iter().take(DRY_RUN_DUPLICATE_PREVIEW) {
            println!(
                "  {} (identical to {})",
                duplicate.source.display(),
                duplicate.dest.display()
            );
        }
        if plan.duplicates.len() > DRY_RUN_DUPLICATE_PREVIEW {
            println!(
                "  ... and {} more",
                plan.duplicates.len() - DRY_RUN_DUPLICATE_PREVIEW
            );
        }
    }
}
