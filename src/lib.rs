//! foldersort - sort a folder tree by file type
//!
//! This library classifies files by extension, moves them into category
//! folders under Latin-safe names, removes the directories left empty and
//! unpacks ZIP, TAR and GZ archives into per-archive folders.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod normalize;
pub mod output;

pub use config::{CompiledFilters, ConfigError, SortConfig};
pub use file_category::Category;
pub use file_organizer::{FileOrganizer, OrganizeError, Progress, SortReport};
pub use normalize::normalize;

pub use cli::{CliError, run_cli, run_cli_with_config};
