//! Folder sorting pipeline.
//!
//! A run makes three passes over the root folder:
//! 1. every file is moved to `root/<category>/<normalized name>`,
//! 2. directories left empty are removed, children before parents,
//! 3. archives are unpacked into `root/archives/<stem>/`.
//!
//! The first error aborts the run. Work done before it is kept.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::archive::{self, ArchiveError};
use crate::config::{CompiledFilters, OrganizeSettings};
use crate::file_category::Category;
use crate::normalize::normalize;

/// Errors that can occur while sorting a folder.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The folder to sort does not exist.
    #[error("Folder '{}' does not exist", path.display())]
    PathNotFound { path: PathBuf },
    /// The path to sort exists but is not a directory.
    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },
    /// Traversing the folder tree failed.
    #[error("Failed to walk folder tree: {0}")]
    Walk(#[from] walkdir::Error),
    /// Failed to create a category or extraction directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    MoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// Failed to inspect or remove an empty directory.
    #[error("Failed to remove directory {}: {source}", path.display())]
    RemoveDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to unpack an archive.
    #[error("Failed to extract {}: {source}", archive.display())]
    ExtractFailed {
        archive: PathBuf,
        source: ArchiveError,
    },
}

/// Result type for folder sorting operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A single file moved by the sorting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Where the file was found.
    pub original_path: PathBuf,
    /// Where the file ended up.
    pub new_path: PathBuf,
    /// The category the file was routed to.
    pub category: Category,
    /// True when another file already sat at `new_path` and was replaced.
    pub overwrote: bool,
}

impl Operation {
    /// Returns true when the file was already at its destination.
    pub fn is_in_place(&self) -> bool {
        self.original_path == self.new_path
    }
}

/// An archive unpacked by the extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub archive: PathBuf,
    pub destination: PathBuf,
    pub files_extracted: usize,
}

/// Everything a run did.
#[derive(Debug, Default)]
pub struct SortReport {
    pub operations: Vec<Operation>,
    pub removed_dirs: Vec<PathBuf>,
    pub extractions: Vec<Extraction>,
}

impl SortReport {
    /// Number of files that actually changed location.
    pub fn moved_files(&self) -> usize {
        self.operations.iter().filter(|op| !op.is_in_place()).count()
    }

    /// Number of moves that replaced an existing file.
    pub fn overwritten_files(&self) -> usize {
        self.operations.iter().filter(|op| op.overwrote).count()
    }

    /// Number of files per category, in category order, skipping empty ones.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let count = self
                    .operations
                    .iter()
                    .filter(|op| op.category == category)
                    .count();
                (category, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

/// Progress events emitted while the sorting pass runs.
#[derive(Debug)]
pub enum Progress<'r> {
    /// The file list was collected; this many files will be sorted.
    FilesFound(usize),
    /// One file was sorted.
    FileSorted(&'r Operation),
}

/// Sorts one root folder.
///
/// Construction validates the root, so a missing folder is reported before
/// anything on disk is touched.
pub struct FileOrganizer<'a> {
    root: PathBuf,
    settings: &'a OrganizeSettings,
    filters: &'a CompiledFilters,
}

impl<'a> FileOrganizer<'a> {
    /// Creates an organizer for `root`.
    ///
    /// # Errors
    ///
    /// Returns `PathNotFound` if `root` does not exist and `NotADirectory` if
    /// it is a file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use foldersort::config::{CompiledFilters, OrganizeSettings};
    /// use foldersort::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let settings = OrganizeSettings::default();
    /// let filters = CompiledFilters::allow_all();
    /// let organizer = FileOrganizer::new(Path::new("/home/user/Downloads"), &settings, &filters)?;
    /// let report = organizer.run()?;
    /// println!("Moved {} files", report.moved_files());
    /// # Ok::<(), foldersort::file_organizer::OrganizeError>(())
    /// ```
    pub fn new(
        root: &Path,
        settings: &'a OrganizeSettings,
        filters: &'a CompiledFilters,
    ) -> OrganizeResult<Self> {
        if !root.exists() {
            return Err(OrganizeError::PathNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(OrganizeError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            settings,
            filters,
        })
    }

    /// The folder being sorted.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Runs all enabled passes in order.
    pub fn run(&self) -> OrganizeResult<SortReport> {
        self.run_with_progress(|_| {})
    }

    /// Runs all enabled passes, reporting each sorted file to `on_progress`.
    pub fn run_with_progress<F>(&self, mut on_progress: F) -> OrganizeResult<SortReport>
    where
        F: FnMut(Progress<'_>),
    {
        let mut report = SortReport::default();

        let files = self.collect_files()?;
        on_progress(Progress::FilesFound(files.len()));
        for file in &files {
            let operation = self.sort_file(file)?;
            on_progress(Progress::FileSorted(&operation));
            report.operations.push(operation);
        }

        if self.settings.remove_empty_dirs {
            report.removed_dirs = self.remove_empty_dirs()?;
        }

        if self.settings.extract_archives {
            report.extractions = self.extract_archives()?;
        }

        Ok(report)
    }

    /// Lists every file the sorting pass will move.
    ///
    /// The list is a snapshot taken before any move, so folders created while
    /// sorting are never walked. Directories (and links to them) are skipped,
    /// as is everything inside extraction folders (see [`Self::extraction_dirs`]).
    pub fn collect_files(&self) -> OrganizeResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in self.walk_sortable() {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            if self.is_included(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    /// Moves one file into its category folder under a normalized name.
    ///
    /// The category folder is created if needed. An existing file at the
    /// destination is silently replaced; the returned operation flags it.
    pub fn sort_file(&self, file_path: &Path) -> OrganizeResult<Operation> {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let category = Category::from_file_name(&file_name);
        let category_path = self.root.join(category.dir_name());

        fs::create_dir_all(&category_path).map_err(|source| {
            OrganizeError::DirectoryCreationFailed {
                path: category_path.clone(),
                source,
            }
        })?;

        let destination_path = category_path.join(normalize(&file_name));

        if destination_path == file_path {
            log::debug!("{} already in place", file_path.display());
            return Ok(Operation {
                original_path: file_path.to_path_buf(),
                new_path: destination_path,
                category,
                overwrote: false,
            });
        }

        let overwrote = destination_path.exists();
        if overwrote {
            log::warn!(
                "{} replaces existing {}",
                file_path.display(),
                destination_path.display()
            );
        }

        fs::rename(file_path, &destination_path).map_err(|source| OrganizeError::MoveFailed {
            from: file_path.to_path_buf(),
            to: destination_path.clone(),
            source,
        })?;

        log::debug!(
            "Moved {} -> {}",
            file_path.display(),
            destination_path.display()
        );

        Ok(Operation {
            original_path: file_path.to_path_buf(),
            new_path: destination_path,
            category,
            overwrote,
        })
    }

    /// Removes every empty directory below the root, deepest first.
    ///
    /// A directory whose only contents were empty directories is removed in
    /// the same pass. The root itself is never removed.
    pub fn remove_empty_dirs(&self) -> OrganizeResult<Vec<PathBuf>> {
        let mut removed = Vec::new();

        for entry in WalkDir::new(&self.root).min_depth(1).contents_first(true) {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            let is_empty = fs::read_dir(path)
                .map_err(|source| OrganizeError::RemoveDirFailed {
                    path: path.to_path_buf(),
                    source,
                })?
                .next()
                .is_none();

            if is_empty {
                fs::remove_dir(path).map_err(|source| OrganizeError::RemoveDirFailed {
                    path: path.to_path_buf(),
                    source,
                })?;
                log::info!("Removed empty directory {}", path.display());
                removed.push(path.to_path_buf());
            }
        }

        Ok(removed)
    }

    /// Unpacks every archive found under the root into `archives/<stem>/`.
    ///
    /// The `archives` folder is created even when there is nothing to unpack.
    pub fn extract_archives(&self) -> OrganizeResult<Vec<Extraction>> {
        let archives_dir = self.archives_dir();
        fs::create_dir_all(&archives_dir).map_err(|source| {
            OrganizeError::DirectoryCreationFailed {
                path: archives_dir.clone(),
                source,
            }
        })?;

        let mut archives = Vec::new();
        for entry in self.walk_sortable() {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() || !self.is_included(path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if Category::from_file_name(&name).is_archive() {
                archives.push((path.to_path_buf(), archive::archive_stem(&name)));
            }
        }

        let mut extractions = Vec::with_capacity(archives.len());
        for (archive_path, stem) in archives {
            let destination = archives_dir.join(stem);
            fs::create_dir_all(&destination).map_err(|source| {
                OrganizeError::DirectoryCreationFailed {
                    path: destination.clone(),
                    source,
                }
            })?;

            let files_extracted =
                archive::extract_archive(&archive_path, &destination).map_err(|source| {
                    OrganizeError::ExtractFailed {
                        archive: archive_path.clone(),
                        source,
                    }
                })?;

            log::info!(
                "Extracted {} into {}",
                archive_path.display(),
                destination.display()
            );
            extractions.push(Extraction {
                archive: archive_path,
                destination,
                files_extracted,
            });
        }

        Ok(extractions)
    }

    fn archives_dir(&self) -> PathBuf {
        self.root.join(Category::Archive.dir_name())
    }

    /// Folders under `archives/` that hold an extracted archive.
    ///
    /// `archives/<name>/` counts only when an archive whose stem is `<name>`
    /// sits next to it. Any other folder under `archives/` is user content.
    pub fn extraction_dirs(&self) -> HashSet<PathBuf> {
        let archives_dir = self.archives_dir();
        let entries = match fs::read_dir(&archives_dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Cannot list {}: {}", archives_dir.display(), e);
                }
                return HashSet::new();
            }
        };

        entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|t| !t.is_dir()))
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                Category::from_file_name(&name)
                    .is_archive()
                    .then(|| archives_dir.join(archive::archive_stem(&name)))
            })
            .collect()
    }

    /// Walks the tree top-down without entering extraction folders.
    fn walk_sortable(&self) -> impl Iterator<Item = walkdir::Result<DirEntry>> + '_ {
        let extraction_dirs = self.extraction_dirs();
        WalkDir::new(&self.root)
            .min_depth(1)
            .into_iter()
            .filter_entry(move |entry| {
                !(entry.file_type().is_dir() && extraction_dirs.contains(entry.path()))
            })
    }

    fn is_included(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.filters.should_include(relative)
    }
}
