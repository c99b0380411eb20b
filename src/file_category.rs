//! Extension-based file categorization.
//!
//! Every file is routed to exactly one [`Category`] by looking its extension up
//! in a fixed table. The table is walked in definition order and the first
//! category listing the extension wins; anything unlisted is
//! [`Category::Unknown`].
//!
//! # Examples
//!
//! ```
//! use foldersort::file_category::Category;
//!
//! assert_eq!(Category::from_extension("jpg"), Category::Image);
//! assert_eq!(Category::from_extension(".MP4"), Category::Video);
//! assert_eq!(Category::from_extension("xyz"), Category::Unknown);
//! ```

use crate::normalize::split_extension;

/// Represents a broad file category.
///
/// Each category owns one folder directly under the sorted root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Image files (JPEG, PNG, JPG, SVG)
    Image,
    /// Video files (AVI, MP4, MOV, MKV)
    Video,
    /// Document files (DOC, DOCX, TXT, PDF, XLSX, PPTX)
    Document,
    /// Audio files (MP3, OGG, WAV, AMR)
    Audio,
    /// Archive files (ZIP, GZ, TAR)
    Archive,
    /// Anything not listed above
    Unknown,
}

/// Category table in lookup order. Extensions are uppercase, without the dot.
const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (Category::Image, &["JPEG", "PNG", "JPG", "SVG"]),
    (Category::Video, &["AVI", "MP4", "MOV", "MKV"]),
    (
        Category::Document,
        &["DOC", "DOCX", "TXT", "PDF", "XLSX", "PPTX"],
    ),
    (Category::Audio, &["MP3", "OGG", "WAV", "AMR"]),
    (Category::Archive, &["ZIP", "GZ", "TAR"]),
];

impl Category {
    /// All categories, in the order they are reported.
    pub const ALL: [Category; 6] = [
        Category::Image,
        Category::Video,
        Category::Document,
        Category::Audio,
        Category::Archive,
        Category::Unknown,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::Category;
    ///
    /// assert_eq!(Category::Image.dir_name(), "images");
    /// assert_eq!(Category::Video.dir_name(), "video");
    /// assert_eq!(Category::Unknown.dir_name(), "unknown");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Image => "images",
            Category::Video => "video",
            Category::Document => "documents",
            Category::Audio => "audio",
            Category::Archive => "archives",
            Category::Unknown => "unknown",
        }
    }

    /// Classifies a file extension, with or without its leading dot.
    ///
    /// The comparison is case-insensitive. An empty extension is always
    /// [`Category::Unknown`].
    pub fn from_extension(ext: &str) -> Category {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_uppercase();
        if ext.is_empty() {
            return Category::Unknown;
        }

        CATEGORY_TABLE
            .iter()
            .find(|(_, extensions)| extensions.contains(&ext.as_str()))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Unknown)
    }

    /// Classifies a file by name, using the text after its last `.`.
    ///
    /// # Examples
    ///
    /// ```
    /// use foldersort::file_category::Category;
    ///
    /// assert_eq!(Category::from_file_name("Фото.JPG"), Category::Image);
    /// assert_eq!(Category::from_file_name("backup.tar.gz"), Category::Archive);
    /// assert_eq!(Category::from_file_name("README"), Category::Unknown);
    /// ```
    pub fn from_file_name(name: &str) -> Category {
        let (_, ext) = split_extension(name);
        Category::from_extension(ext)
    }

    /// Returns true for files the extraction pass unpacks.
    pub fn is_archive(&self) -> bool {
        matches!(self, Category::Archive)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Image.dir_name(), "images");
        assert_eq!(Category::Video.dir_name(), "video");
        assert_eq!(Category::Document.dir_name(), "documents");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Archive.dir_name(), "archives");
        assert_eq!(Category::Unknown.dir_name(), "unknown");
    }

    #[test]
    fn test_every_listed_extension_maps_to_its_category() {
        let expected = [
            (Category::Image, vec!["JPEG", "PNG", "JPG", "SVG"]),
            (Category::Video, vec!["AVI", "MP4", "MOV", "MKV"]),
            (
                Category::Document,
                vec!["DOC", "DOCX", "TXT", "PDF", "XLSX", "PPTX"],
            ),
            (Category::Audio, vec!["MP3", "OGG", "WAV", "AMR"]),
            (Category::Archive, vec!["ZIP", "GZ", "TAR"]),
        ];

        for (category, extensions) in expected {
            for ext in extensions {
                assert_eq!(Category::from_extension(ext), category, "{ext}");
            }
        }
    }

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(Category::from_extension("png"), Category::Image);
        assert_eq!(Category::from_extension("Mp3"), Category::Audio);
        assert_eq!(Category::from_extension("dOcX"), Category::Document);
    }

    #[test]
    fn test_from_extension_accepts_leading_dot() {
        assert_eq!(Category::from_extension(".zip"), Category::Archive);
        assert_eq!(Category::from_extension(".MKV"), Category::Video);
    }

    #[test]
    fn test_unlisted_and_empty_extensions_are_unknown() {
        assert_eq!(Category::from_extension(""), Category::Unknown);
        assert_eq!(Category::from_extension("."), Category::Unknown);
        assert_eq!(Category::from_extension("rs"), Category::Unknown);
        assert_eq!(Category::from_extension("gif"), Category::Unknown);
        assert_eq!(Category::from_extension("7z"), Category::Unknown);
    }

    #[test]
    fn test_from_file_name_uses_last_extension() {
        assert_eq!(Category::from_file_name("report.final.pdf"), Category::Document);
        assert_eq!(Category::from_file_name("data.tar.gz"), Category::Archive);
        assert_eq!(Category::from_file_name("README"), Category::Unknown);
        assert_eq!(Category::from_file_name(".gitignore"), Category::Unknown);
        assert_eq!(Category::from_file_name("trailing."), Category::Unknown);
    }

    #[test]
    fn test_table_has_no_overlaps() {
        for (i, (_, left)) in CATEGORY_TABLE.iter().enumerate() {
            for (_, right) in &CATEGORY_TABLE[i + 1..] {
                assert!(left.iter().all(|ext| !right.contains(ext)));
            }
        }
    }

    #[test]
    fn test_only_archives_are_archives() {
        for category in Category::ALL {
            assert_eq!(category.is_archive(), category == Category::Archive);
        }
    }
}
