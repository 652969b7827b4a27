//! Command-line orchestration for qxrename.
//!
//! This module turns a parsed command into calls on the planning and
//! execution core, and prints the results:
//! - Configuration loading and merging with command-line overrides
//! - Plan preview as a table or JSON
//! - Applying ready renames and recording history
//! - Undoing the last applied batch

use crate::config::RenameConfig;
use crate::executor::apply_renames;
use crate::history::{HISTORY_FILE_NAME, HistoryLog, UndoManager};
use crate::models::{PreviewPlan, PreviewRequest, RenameMode};
use crate::name_rule::pattern_error;
use crate::output::OutputFormatter;
use crate::planner::build_preview_filtered;
use std::path::Path;

/// The rename rule as given on the command line.
///
/// `None` fields fall back to the configuration file defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameRule {
    pub mode: Option<RenameMode>,
    pub pattern: String,
    pub replacement: String,
    pub recursive: Option<bool>,
    pub include_files: Option<bool>,
    pub include_folders: Option<bool>,
}

impl RenameRule {
    /// Resolves the rule against configuration defaults into a planning request.
    pub fn to_request(&self, root: &Path, config: &RenameConfig) -> PreviewRequest {
        let defaults = &config.defaults;
        PreviewRequest {
            root_directory: root.to_path_buf(),
            recursive: self.recursive.unwrap_or(defaults.recursive),
            include_files: self.include_files.unwrap_or(defaults.include_files),
            include_folders: self.include_folders.unwrap_or(defaults.include_folders),
            mode: self.mode.unwrap_or(defaults.mode),
            pattern: self.pattern.clone(),
            replacement: self.replacement.clone(),
        }
    }
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone)]
pub enum RenameCommand {
    /// Show what the rule would rename, without touching anything.
    Preview {
        rule: RenameRule,
        /// Print the plan as JSON instead of a table.
        json: bool,
    },
    /// Apply the ready renames of the plan.
    Apply { rule: RenameRule },
    /// Revert the last applied batch.
    Undo,
}

/// Runs a command against `root` using the default configuration lookup.
///
/// # Examples
///
/// ```no_run
/// use qxrename::cli::{run_cli, RenameCommand, RenameRule};
/// use std::path::Path;
///
/// let rule = RenameRule {
///     pattern: "IMG_".to_string(),
///     replacement: "photo_".to_string(),
///     ..Default::default()
/// };
/// match run_cli(RenameCommand::Preview { rule, json: false }, Path::new("/path/to/photos")) {
///     Ok(()) => println!("Preview complete"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: RenameCommand, root: &Path) -> Result<(), String> {
    run_cli_with_config(command, root, None)
}

/// Runs a command against `root` with an optional configuration file.
pub fn run_cli_with_config(
    command: RenameCommand,
    root: &Path,
    config_path: Option<&Path>,
) -> Result<(), String> {
    match command {
        RenameCommand::Preview { rule, json } => preview(&rule, root, config_path, json),
        RenameCommand::Apply { rule } => apply(&rule, root, config_path),
        RenameCommand::Undo => undo(root),
    }
}

/// Loads configuration and builds the plan for `rule`.
fn plan(rule: &RenameRule, root: &Path, config_path: Option<&Path>) -> Result<PreviewPlan, String> {
    if !root.is_dir() {
        return Err(format!("Not a directory: {}", root.display()));
    }

    let config = RenameConfig::load(config_path)
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let filters = config
        .compile_filters()
        .map_err(|e| format!("Error compiling filters: {}", e))?
        .with_reserved_name(HISTORY_FILE_NAME);

    let request = rule.to_request(root, &config);
    if let Some(reason) = pattern_error(request.mode, &request.pattern) {
        OutputFormatter::warning(&format!(
            "Pattern is not valid for {} mode, nothing will match: {}",
            request.mode, reason
        ));
    }

    Ok(build_preview_filtered(&request, &filters, || false))
}

fn preview(
    rule: &RenameRule,
    root: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> Result<(), String> {
    let plan = plan(rule, root, config_path)?;

    if json {
        let rendered = serde_json::to_string_pretty(&plan)
            .map_err(|e| format!("Error rendering plan as JSON: {}", e))?;
        OutputFormatter::plain(&rendered);
        return Ok(());
    }

    OutputFormatter::dry_run_notice(&format!("Planning renames in: {}", root.display()));
    OutputFormatter::preview_table(&plan, root);
    OutputFormatter::summary_table(&plan.stats);
    OutputFormatter::info("No files were modified. Run 'qxrename apply' with the same rule to rename.");
    Ok(())
}

fn apply(rule: &RenameRule, root: &Path, config_path: Option<&Path>) -> Result<(), String> {
    let plan = plan(rule, root, config_path)?;
    let ready = plan.ready_entries();

    let held_back = plan.entries.len() - ready.len();
    if held_back > 0 {
        OutputFormatter::warning(&format!(
            "{} item(s) with conflicts or invalid names will be left alone",
            held_back
        ));
        for entry in plan.entries.iter().filter(|e| !e.is_ready()) {
            OutputFormatter::plain(&format!(
                "   {} [{}]: {}",
                entry.old_path.display(),
                entry.status,
                entry.message
            ));
        }
    }

    if ready.is_empty() {
        OutputFormatter::info("Nothing to rename.");
        return Ok(());
    }

    OutputFormatter::info(&format!("Renaming {} item(s) in: {}", ready.len(), root.display()));
    let pb = OutputFormatter::create_progress_bar(ready.len() as u64);
    let operations = apply_renames(&ready, &mut |line: &str| {
        pb.suspend(|| OutputFormatter::log_line(line));
        pb.inc(1);
    });
    pb.finish_and_clear();

    let failed = ready.len() - operations.len();
    if !operations.is_empty() {
        let history = HistoryLog::new(root.to_path_buf(), operations);
        match history.save() {
            Ok(()) => OutputFormatter::success(&format!(
                "Renamed {} item(s). Use 'qxrename undo {}' to revert.",
                history.operations.len(),
                root.display()
            )),
            Err(e) => {
                OutputFormatter::warning(&format!("Could not save history: {}", e));
                OutputFormatter::warning("Undo will not be available for this batch.");
            }
        }
    }

    if failed > 0 {
        OutputFormatter::error(&format!(
            "{} item(s) could not be renamed. Please review errors above.",
            failed
        ));
    }

    Ok(())
}

fn undo(root: &Path) -> Result<(), String> {
    OutputFormatter::info("Undoing previous rename...");

    let report = UndoManager::undo(root, &mut |line: &str| OutputFormatter::log_line(line))
        .map_err(|e| e.to_string())?;

    OutputFormatter::header("UNDO");
    OutputFormatter::plain(&format!("  Restored: {}", report.restored));

    if !report.skipped.is_empty() {
        OutputFormatter::plain(&format!("  Skipped: {}", report.skipped.len()));
        for (path, reason) in &report.skipped {
            OutputFormatter::plain(&format!("    - {}: {}", path.display(), reason));
        }
    }

    if !report.failed.is_empty() {
        OutputFormatter::plain(&format!("  Failed: {}", report.failed.len()));
        for (path, reason) in &report.failed {
            OutputFormatter::error(&format!("    - {}: {}", path.display(), reason));
        }
    }

    if !report.is_complete_success() {
        OutputFormatter::warning("History file was NOT deleted; fix the issues above and try again.");
    }

    Ok(())
}
