pub mod cli;
pub mod discover;
pub mod error;
pub mod execute;
pub mod exif;
pub mod guard;
pub mod media;
pub mod organize;
pub mod plan;
pub mod resolve;
pub mod video;

pub use cli::Cli;
pub use discover::{Discovered, discover};
pub use error::{ArchivistError, MoveFailures};
pub use media::{MediaFile, MediaKind};
pub use organize::{OrganizeConfig, RunSummary, organize};
pub use plan::{Plan, PlanOptions, PlannedMove};
pub use resolve::{DateLookup, DateSource, ResolvedMedia, Resolution};
