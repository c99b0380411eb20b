//! Run configuration and file filtering.
//!
//! There are no command-line options; settings come from an optional TOML
//! file. Without one the tool sorts every file, removes empty directories and
//! extracts archives.
//!
//! # Configuration File Format
//!
//! ```toml
//! [organize]
//! remove_empty_dirs = true
//! extract_archives = true
//!
//! [filters]
//! skip_hidden_files = false
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["keep/**", "*.part"]
//! regex = ['^~\$']
//! ```
//!
//! Glob patterns are matched against the path relative to the sorted folder;
//! regexes are matched against the bare file name.

use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".foldersortrc.toml";

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(#[from] toml::de::Error),
    /// Invalid glob pattern provided.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidGlobPattern {
        pattern: String,
        source: glob::PatternError,
    },
    /// Invalid regex pattern provided.
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidRegexPattern {
        pattern: String,
        source: regex::Error,
    },
    /// IO error while reading configuration.
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SortConfig {
    /// Which passes run.
    #[serde(default)]
    pub organize: OrganizeSettings,
    /// Which files are left alone.
    #[serde(default)]
    pub filters: FilterRules,
}

/// Pass toggles. The sorting pass always runs.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizeSettings {
    /// Remove directories left empty after sorting.
    #[serde(default = "default_true")]
    pub remove_empty_dirs: bool,
    /// Unpack archives into `archives/<stem>/`.
    #[serde(default = "default_true")]
    pub extract_archives: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OrganizeSettings {
    fn default() -> Self {
        Self {
            remove_empty_dirs: true,
            extract_archives: true,
        }
    }
}

/// Rules deciding which files are excluded from sorting and extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterRules {
    /// Leave files whose name starts with "." where they are.
    #[serde(default)]
    pub skip_hidden_files: bool,

    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExcludeRules {
    /// Exact file names (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns relative to the sorted folder (e.g. "keep/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl SortConfig {
    /// Load configuration, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.foldersortrc.toml` in the current directory
    /// 3. Look for `~/.config/foldersort/config.toml`
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly provided file is missing, or if any
    /// file found cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("foldersort")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Compiled filter rules, ready to be checked per file.
#[derive(Debug)]
pub struct CompiledFilters {
    skip_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    /// Compile filter rules, validating every glob and regex.
    ///
    /// # Errors
    ///
    /// Returns an error for the first invalid pattern.
    pub fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden_files: rules.skip_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Filters that let every file through.
    pub fn allow_all() -> Self {
        Self {
            skip_hidden_files: false,
            exclude_filenames: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
        }
    }

    /// Check whether a file takes part in the run.
    ///
    /// `relative_path` is the file's path below the sorted folder.
    pub fn should_include(&self, relative_path: &Path) -> bool {
        let file_name = relative_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.skip_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_ref()) {
            return false;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative_path))
        {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        Self::allow_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn filters(toml: &str) -> CompiledFilters {
        let config = SortConfig::from_toml(toml).expect("Failed to parse config");
        CompiledFilters::new(&config.filters).expect("Failed to compile filters")
    }

    #[test]
    fn test_default_config_runs_every_pass() {
        let config = SortConfig::default();
        assert!(config.organize.remove_empty_dirs);
        assert!(config.organize.extract_archives);
        assert!(!config.filters.skip_hidden_files);
    }

    #[test]
    fn test_empty_toml_matches_defaults() {
        let config = SortConfig::from_toml("").unwrap();
        assert!(config.organize.remove_empty_dirs);
        assert!(config.organize.extract_archives);
        assert!(config.filters.exclude.patterns.is_empty());
    }

    #[test]
    fn test_partial_organize_section_keeps_other_defaults() {
        let config = SortConfig::from_toml("[organize]\nextract_archives = false\n").unwrap();
        assert!(config.organize.remove_empty_dirs);
        assert!(!config.organize.extract_archives);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = SortConfig::from_toml("[organize\n");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_hidden_files_included_by_default() {
        let compiled = filters("");
        assert!(compiled.should_include(Path::new(".gitignore")));
        assert!(compiled.should_include(Path::new("sub/.env")));
    }

    #[test]
    fn test_hidden_files_skipped_when_enabled() {
        let compiled = filters("[filters]\nskip_hidden_files = true\n");
        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(!compiled.should_include(Path::new("sub/.env")));
        assert!(compiled.should_include(Path::new("visible.txt")));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let compiled = filters("[filters.exclude]\nfilenames = [\"Thumbs.db\"]\n");
        assert!(!compiled.should_include(Path::new("Thumbs.db")));
        assert!(!compiled.should_include(Path::new("photos/Thumbs.db")));
        assert!(compiled.should_include(Path::new("image.jpg")));
    }

    #[test]
    fn test_exclude_glob_patterns_are_relative() {
        let compiled = filters("[filters.exclude]\npatterns = [\"keep/**\", \"*.part\"]\n");
        assert!(!compiled.should_include(Path::new("keep/a.txt")));
        assert!(!compiled.should_include(Path::new("keep/deep/b.png")));
        assert!(!compiled.should_include(Path::new("movie.part")));
        assert!(compiled.should_include(Path::new("other/keep/a.txt")));
        assert!(compiled.should_include(Path::new("a.txt")));
    }

    #[test]
    fn test_exclude_regex_on_file_name() {
        let compiled = filters("[filters.exclude]\nregex = ['^~\\$']\n");
        assert!(!compiled.should_include(Path::new("docs/~$report.docx")));
        assert!(compiled.should_include(Path::new("report.docx")));
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let config = SortConfig::from_toml("[filters.exclude]\nregex = [\"[invalid(\"]\n").unwrap();
        let result = CompiledFilters::new(&config.filters);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_glob_returns_error() {
        let config = SortConfig::from_toml("[filters.exclude]\npatterns = [\"[invalid\"]\n").unwrap();
        let result = CompiledFilters::new(&config.filters);
        assert!(matches!(result, Err(ConfigError::InvalidGlobPattern { .. })));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = SortConfig::load(Some(Path::new("/non/existent/foldersort.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[organize]\nremove_empty_dirs = false\n").unwrap();

        let config = SortConfig::load(Some(&path)).unwrap();
        assert!(!config.organize.remove_empty_dirs);
        assert!(config.organize.extract_archives);
    }

    #[test]
    fn test_allow_all_includes_everything() {
        let compiled = CompiledFilters::allow_all();
        assert!(compiled.should_include(Path::new(".hidden")));
        assert!(compiled.should_include(Path::new("a/b/c.txt")));
    }
}
