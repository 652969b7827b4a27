//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored status
//! messages, the rename plan table, summary counts and the progress bar shown
//! while renames are applied.

use crate::models::{EntryStatus, PreviewEntry, PreviewPlan, PreviewStats};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - The plan table and its summary
/// - Progress bars for applying renames
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use qxrename::output::OutputFormatter;
    /// OutputFormatter::success("Renamed 3 items");
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

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints one executor or undo log line, styled by its outcome.
    pub fn log_line(line: &str) {
        if line.starts_with("Failed") || line.starts_with("Undo failed") {
            Self::error(line);
        } else if line.starts_with("Undo skipped") {
            Self::warning(line);
        } else {
            Self::success(line);
        }
    }

    /// Creates and returns a progress bar for applying renames.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use qxrename::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(10);
    /// pb.inc(1);
    /// pb.finish_with_message("done");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints the plan as a table, with paths shown relative to `root`.
    pub fn preview_table(plan: &PreviewPlan, root: &Path) {
        if plan.entries.is_empty() {
            Self::plain("No items would be renamed.");
            return;
        }

        let rows: Vec<(String, &PreviewEntry, String, String)> = plan
            .entries
            .iter()
            .map(|entry| {
                (
                    entry.kind.label().to_string(),
                    entry,
                    display_relative(&entry.old_path, root),
                    display_relative(&entry.final_new_path, root),
                )
            })
            .collect();

        let old_width = rows
            .iter()
            .map(|(_, _, old, _)| old.chars().count())
            .max()
            .unwrap_or(0)
            .max(3);

        Self::header("PLAN");
        println!(
            "{:<6} | {:<8} | {:<old_width$} → {}",
            "Kind".bold(),
            "Status".bold(),
            "Old".bold(),
            "New".bold(),
            old_width = old_width
        );
        println!("{}", "-".repeat(old_width + 30));

        for (kind, entry, old, new) in &rows {
            let status = match entry.status {
                EntryStatus::Ready => entry.status.label().green(),
                EntryStatus::Conflict => entry.status.label().yellow(),
                EntryStatus::Invalid => entry.status.label().red(),
            };
            let message = if entry.message.is_empty() {
                String::new()
            } else {
                format!("  ({})", entry.message)
            };
            println!(
                "{:<6} | {:<8} | {:<old_width$} → {}{}",
                kind,
                status,
                old,
                new,
                message.dimmed(),
                old_width = old_width
            );
        }
    }

    /// Prints the aggregate counts of a planning run.
    pub fn summary_table(stats: &PreviewStats) {
        Self::header("SUMMARY");
        let rows = [
            ("Items", stats.total_items.to_string().normal()),
            ("Ready", stats.ready.to_string().green()),
            ("Conflicts", stats.conflicts.to_string().yellow()),
            ("Invalid", stats.invalid.to_string().red()),
            ("Unchanged", stats.unchanged().to_string().dimmed()),
        ];
        for (label, value) in rows {
            println!("{:<10} | {}", label.bold(), value);
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[PREVIEW] {}", message).yellow());
    }
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
