//! Output formatting and styling module.
//!
//! All console output of the binary goes through [`OutputFormatter`], so the
//! sorting code itself never prints.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::file_category::Category;
use crate::file_organizer::SortReport;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - A progress bar for the sorting pass
/// - A per-category summary table
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// ```no_run
    /// use foldersort::output::OutputFormatter;
    /// OutputFormatter::success("Folder sorted");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for `total` file moves.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints how many files went to each category, plus what the cleanup
    /// and extraction passes did.
    pub fn summary_table(report: &SortReport) {
        Self::header("SUMMARY");

        let counts = report.category_counts();
        let width = Category::ALL
            .iter()
            .map(|category| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in &counts {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                plural(*count, "file"),
                width = width
            );
        }

        let total = report.operations.len();
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            plural(total, "file"),
            width = width
        );

        println!(
            "\n{} empty {} removed, {} {} extracted",
            report.removed_dirs.len(),
            plural(report.removed_dirs.len(), "directory"),
            report.extractions.len(),
            plural(report.extractions.len(), "archive"),
        );

        let overwritten = report.overwritten_files();
        if overwritten > 0 {
            Self::warning(&format!(
                "{} {} replaced an existing file with the same normalized name",
                overwritten,
                plural(overwritten, "file")
            ));
        }
    }
}

fn plural(count: usize, word: &str) -> String {
    match (count, word) {
        (1, _) => word.to_string(),
        (_, "directory") => "directories".to_string(),
        _ => format!("{word}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "file"), "file");
        assert_eq!(plural(0, "file"), "files");
        assert_eq!(plural(2, "archive"), "archives");
        assert_eq!(plural(3, "directory"), "directories");
        assert_eq!(plural(1, "directory"), "directory");
    }
}
