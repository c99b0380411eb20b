//! Command-line interface module for foldersort.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing (a single folder path, nothing else)
//! - Configuration loading and filter compilation
//! - Running the three passes with progress output
//! - Turning every failure into one typed error for `main` to report

use crate::config::{CompiledFilters, ConfigError, SortConfig};
use crate::file_organizer::{FileOrganizer, OrganizeError, Progress, SortReport};
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Sort a folder into category subfolders, transliterate Cyrillic file names,
/// remove empty directories and unpack archives.
#[derive(Debug, Parser)]
#[command(name = "foldersort", version, about)]
pub struct Cli {
    /// Folder to sort
    pub folder: PathBuf,
}

/// Any failure of a run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

/// Runs the CLI application on the given folder.
///
/// Configuration is discovered from `.foldersortrc.toml` in the working
/// directory or `~/.config/foldersort/config.toml`.
///
/// # Examples
///
/// ```no_run
/// use foldersort::cli::run_cli;
/// use std::path::Path;
///
/// match run_cli(Path::new("/path/to/folder")) {
///     Ok(report) => println!("Moved {} files", report.moved_files()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(dir_path: &Path) -> Result<SortReport, CliError> {
    run_cli_with_config(dir_path, None)
}

/// Runs the CLI application with an optional explicit configuration file.
///
/// Nothing on disk changes if the folder is missing or the configuration is
/// invalid. Otherwise the passes run in order and the first error stops the
/// run, leaving the work done so far in place.
pub fn run_cli_with_config(
    dir_path: &Path,
    config_path: Option<&Path>,
) -> Result<SortReport, CliError> {
    let config = SortConfig::load(config_path)?;
    let filters = CompiledFilters::new(&config.filters)?;
    let organizer = FileOrganizer::new(dir_path, &config.organize, &filters)?;

    OutputFormatter::info(&format!("Sorting contents of: {}", dir_path.display()));

    let pb = OutputFormatter::create_progress_bar(0);
    let mut total = 0;
    let report = organizer
        .run_with_progress(|progress| match progress {
            Progress::FilesFound(found) => {
                total = found;
                pb.set_length(found as u64);
            }
            Progress::FileSorted(operation) => {
                pb.set_message(operation.category.dir_name());
                pb.inc(1);
            }
        })
        .inspect_err(|_| pb.abandon())?;
    pb.finish_and_clear();

    OutputFormatter::success(&format!(
        "Sorted {} of {} files",
        report.moved_files(),
        total
    ));
    if config.organize.remove_empty_dirs {
        OutputFormatter::success(&format!(
            "Removed {} empty directories",
            report.removed_dirs.len()
        ));
    }
    for extraction in &report.extractions {
        OutputFormatter::success(&format!(
            "Extracted {} ({} files)",
            extraction.archive.display(),
            extraction.files_extracted
        ));
    }

    OutputFormatter::summary_table(&report);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_takes_one_folder() {
        let cli = Cli::try_parse_from(["foldersort", "/tmp/inbox"]).unwrap();
        assert_eq!(cli.folder, PathBuf::from("/tmp/inbox"));
    }

    #[test]
    fn test_cli_rejects_missing_folder() {
        assert!(Cli::try_parse_from(["foldersort"]).is_err());
    }

    #[test]
    fn test_cli_rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["foldersort", "a", "b"]).is_err());
    }

    #[test]
    fn test_missing_folder_is_organize_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "").unwrap();

        let result = run_cli_with_config(Path::new("/non/existent/folder"), Some(&config_path));
        assert!(matches!(
            result,
            Err(CliError::Organize(OrganizeError::PathNotFound { .. }))
        ));
    }
}
