use qxrename::cli::{RenameCommand, RenameRule, run_cli_with_config};
/// Integration tests for qxrename
///
/// These tests run the planner, executor and CLI orchestration against real
/// temporary directory trees.
///
/// Test categories:
/// 1. Planning end to end
/// 2. Apply and undo through the library
/// 3. CLI workflows with history
/// 4. Configuration and filtering
use qxrename::history::{HISTORY_FILE_NAME, HistoryLog};
use qxrename::{
    EntryStatus, ItemKind, PreviewRequest, RenameMode, apply_renames, build_preview, undo_renames,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture that sets up a temporary directory tree.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        TestFixture { temp_dir }
    }

    fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and any missing parent folders) with text content.
    fn create_text_file(&self, rel_path: &str, content: &str) {
        let file_path = self.path().join(rel_path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write file content");
    }

    fn create_subdir(&self, rel_path: &str) {
        fs::create_dir_all(self.path().join(rel_path)).expect("Failed to create subdirectory");
    }

    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(
            path.exists() && path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    fn assert_not_exists(&self, rel_path: &str) {
        let path = self.path().join(rel_path);
        assert!(!path.exists(), "Path should not exist: {}", path.display());
    }

    fn read(&self, rel_path: &str) -> String {
        fs::read_to_string(self.path().join(rel_path)).expect("Failed to read file")
    }

    /// Every path in the tree relative to the root, excluding the history file.
    fn snapshot(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        Self::walk_dir(self.path(), self.path(), &mut paths);
        paths.sort();
        paths
    }

    fn walk_dir(root: &Path, dir: &Path, paths: &mut Vec<PathBuf>) {
        if let Ok(entries) = fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if entry.file_name() == HISTORY_FILE_NAME {
                    continue;
                }
                paths.push(path.strip_prefix(root).unwrap().to_path_buf());
                if path.is_dir() {
                    Self::walk_dir(root, &path, paths);
                }
            }
        }
    }

    fn request(&self, mode: RenameMode, pattern: &str, replacement: &str) -> PreviewRequest {
        PreviewRequest {
            root_directory: self.path().to_path_buf(),
            recursive: true,
            include_files: true,
            include_folders: true,
            mode,
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

fn rule(mode: RenameMode, pattern: &str, replacement: &str) -> RenameRule {
    RenameRule {
        mode: Some(mode),
        pattern: pattern.to_string(),
        replacement: replacement.to_string(),
        recursive: Some(true),
        include_files: Some(true),
        include_folders: Some(true),
    }
}

// ============================================================================
// Test Suite 1: Planning
// ============================================================================

#[test]
fn test_plan_renamed_folder_with_unchanged_child() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "a");
    fixture.create_text_file("b.txt", "b");
    fixture.create_text_file("old/x.txt", "x");

    let plan = build_preview(&fixture.request(RenameMode::Replace, "old", "new"), || false);

    // x.txt keeps its name, so only the folder is planned; x.txt moves with it.
    assert_eq!(plan.stats.total_items, 4);
    assert_eq!(plan.entries.len(), 1);
    let folder = &plan.entries[0];
    assert_eq!(folder.kind, ItemKind::Folder);
    assert_eq!(folder.status, EntryStatus::Ready);
    assert_eq!(folder.final_new_path, fixture.path().join("new"));
}

#[test]
fn test_plan_renamed_folder_with_renamed_child() {
    let fixture = TestFixture::new();
    fixture.create_text_file("old/old_x.txt", "x");

    let plan = build_preview(&fixture.request(RenameMode::Replace, "old", "new"), || false);

    let file = plan
        .entry_for(&fixture.path().join("old").join("old_x.txt"))
        .expect("file should be planned");
    assert_eq!(file.raw_new_path, fixture.path().join("old").join("new_x.txt"));
    assert_eq!(file.final_new_path, fixture.path().join("new").join("new_x.txt"));
    assert_eq!(file.status, EntryStatus::Ready);
    assert_eq!(plan.stats.ready, 2);
}

#[test]
fn test_plan_same_file_name_in_sibling_folders_is_not_a_conflict() {
    let fixture = TestFixture::new();
    fixture.create_text_file("one/img_1.png", "1");
    fixture.create_text_file("two/img_1.png", "2");

    let plan = build_preview(
        &fixture.request(RenameMode::Regex, r"^img_(\d+)", "photo_$1"),
        || false,
    );

    assert_eq!(plan.stats.ready, 2);
    assert_eq!(plan.stats.conflicts, 0);
}

#[test]
fn test_plan_folder_renamed_into_existing_folder_conflicts() {
    let fixture = TestFixture::new();
    fixture.create_subdir("draft");
    fixture.create_subdir("final");

    let plan = build_preview(&fixture.request(RenameMode::Wildcard, "dr*", "final"), || false);

    let entry = plan.entry_for(&fixture.path().join("draft")).unwrap();
    assert_eq!(entry.status, EntryStatus::Conflict);
    assert_eq!(entry.message, "target already exists");
}

#[test]
fn test_plan_non_recursive_ignores_nested_entries() {
    let fixture = TestFixture::new();
    fixture.create_text_file("foo.txt", "top");
    fixture.create_text_file("sub/foo.txt", "nested");

    let request = PreviewRequest {
        recursive: false,
        ..fixture.request(RenameMode::Replace, "foo", "bar")
    };
    let plan = build_preview(&request, || false);

    assert_eq!(plan.stats.total_items, 2);
    assert_eq!(plan.entries.len(), 1);
    assert_eq!(plan.entries[0].old_path, fixture.path().join("foo.txt"));
}

// ============================================================================
// Test Suite 2: Apply and Undo
// ============================================================================

#[test]
fn test_apply_and_undo_restore_original_tree() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "a");
    fixture.create_text_file("b.txt", "b");
    fixture.create_text_file("old/x.txt", "x");
    fixture.create_text_file("old/old_notes.md", "notes");
    let before = fixture.snapshot();

    let plan = build_preview(&fixture.request(RenameMode::Replace, "old", "new"), || false);
    let mut log = Vec::new();
    let operations = apply_renames(&plan.ready_entries(), &mut |line: &str| {
        log.push(line.to_string())
    });

    assert_eq!(operations.len(), 2);
    assert_eq!(log.len(), 2);
    fixture.assert_dir_exists("new");
    fixture.assert_file_exists("new/x.txt");
    fixture.assert_file_exists("new/new_notes.md");
    fixture.assert_not_exists("old/x.txt");
    fixture.assert_not_exists("old");

    let reversed: Vec<_> = operations.into_iter().rev().collect();
    let report = undo_renames(&reversed, &mut |_: &str| {});

    assert!(report.is_complete_success());
    assert_eq!(fixture.snapshot(), before);
    assert_eq!(fixture.read("old/old_notes.md"), "notes");
}

#[test]
fn test_apply_skips_vanished_source_and_continues() {
    let fixture = TestFixture::new();
    fixture.create_text_file("foo1.txt", "1");
    fixture.create_text_file("foo2.txt", "2");

    let plan = build_preview(&fixture.request(RenameMode::Replace, "foo", "bar"), || false);
    fs::remove_file(fixture.path().join("foo1.txt")).unwrap();

    let mut log = Vec::new();
    let operations = apply_renames(&plan.ready_entries(), &mut |line: &str| {
        log.push(line.to_string())
    });

    assert_eq!(operations.len(), 1);
    assert!(log.iter().any(|line| line.starts_with("Failed to rename file:")));
    fixture.assert_file_exists("bar2.txt");
}

#[test]
fn test_apply_target_created_after_planning_is_not_overwritten() {
    let fixture = TestFixture::new();
    fixture.create_text_file("foo.txt", "original");

    let plan = build_preview(&fixture.request(RenameMode::Replace, "foo", "bar"), || false);
    fixture.create_text_file("bar.txt", "newcomer");

    let operations = apply_renames(&plan.ready_entries(), &mut |_: &str| {});

    assert!(operations.is_empty());
    assert_eq!(fixture.read("bar.txt"), "newcomer");
    assert_eq!(fixture.read("foo.txt"), "original");
}

// ============================================================================
// Test Suite 3: CLI workflows
// ============================================================================

#[test]
fn test_cli_preview_does_not_modify_tree() {
    let fixture = TestFixture::new();
    fixture.create_text_file("foo.txt", "f");
    let before = fixture.snapshot();

    let result = run_cli_with_config(
        RenameCommand::Preview {
            rule: rule(RenameMode::Replace, "foo", "bar"),
            json: false,
        },
        fixture.path(),
        None,
    );

    assert!(result.is_ok());
    assert_eq!(fixture.snapshot(), before);
    fixture.assert_not_exists(HISTORY_FILE_NAME);
}

#[test]
fn test_cli_preview_json() {
    let fixture = TestFixture::new();
    fixture.create_text_file("foo.txt", "f");

    let result = run_cli_with_config(
        RenameCommand::Preview {
            rule: rule(RenameMode::Replace, "foo", "bar"),
            json: true,
        },
        fixture.path(),
        None,
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("foo.txt");
}

#[test]
fn test_cli_apply_then_undo() {
    let fixture = TestFixture::new();
    fixture.create_text_file("IMG_001.jpg", "1");
    fixture.create_text_file("IMG_002.jpg", "2");
    fixture.create_text_file("notes.txt", "n");
    let before = fixture.snapshot();

    let result = run_cli_with_config(
        RenameCommand::Apply {
            rule: rule(RenameMode::Regex, r"^IMG_(\d+)", "holiday_$1"),
        },
        fixture.path(),
        None,
    );
    assert!(result.is_ok());
    fixture.assert_file_exists("holiday_001.jpg");
    fixture.assert_file_exists("holiday_002.jpg");
    fixture.assert_file_exists("notes.txt");
    fixture.assert_file_exists(HISTORY_FILE_NAME);

    let history = HistoryLog::load(fixture.path()).unwrap().unwrap();
    assert_eq!(history.operations.len(), 2);

    let result = run_cli_with_config(RenameCommand::Undo, fixture.path(), None);
    assert!(result.is_ok());
    assert_eq!(fixture.snapshot(), before);
    fixture.assert_not_exists(HISTORY_FILE_NAME);
}

#[test]
fn test_cli_apply_leaves_conflicts_alone() {
    let fixture = TestFixture::new();
    fixture.create_text_file("a.txt", "a");
    fixture.create_text_file("b.txt", "b");
    fixture.create_text_file("apple.txt", "apple");

    let result = run_cli_with_config(
        RenameCommand::Apply {
            rule: rule(RenameMode::Replace, "a", "b"),
        },
        fixture.path(),
        None,
    );

    assert!(result.is_ok());
    assert_eq!(fixture.read("a.txt"), "a");
    assert_eq!(fixture.read("b.txt"), "b");
    assert_eq!(fixture.read("bpple.txt"), "apple");
}

#[test]
fn test_cli_history_file_is_never_renamed() {
    let fixture = TestFixture::new();
    fixture.create_text_file("history_1.txt", "h");

    let first = run_cli_with_config(
        RenameCommand::Apply {
            rule: rule(RenameMode::Replace, "history", "log"),
        },
        fixture.path(),
        None,
    );
    assert!(first.is_ok());
    fixture.assert_file_exists(HISTORY_FILE_NAME);

    let second = run_cli_with_config(
        RenameCommand::Apply {
            rule: rule(RenameMode::Replace, "history", "log"),
        },
        fixture.path(),
        None,
    );
    assert!(second.is_ok());
    fixture.assert_file_exists(HISTORY_FILE_NAME);
    fixture.assert_file_exists("log_1.txt");
}

#[test]
fn test_cli_undo_without_history() {
    let fixture = TestFixture::new();
    let result = run_cli_with_config(RenameCommand::Undo, fixture.path(), None);
    assert!(result.is_err());
}

#[test]
fn test_cli_undo_keeps_history_when_incomplete() {
    let fixture = TestFixture::new();
    fixture.create_text_file("foo.txt", "f");

    run_cli_with_config(
        RenameCommand::Apply {
            rule: rule(RenameMode::Replace, "foo", "bar"),
        },
        fixture.path(),
        None,
    )
    .expect("apply failed");
    fs::remove_file(fixture.path().join("bar.txt")).unwrap();

    let result = run_cli_with_config(RenameCommand::Undo, fixture.path(), None);

    assert!(result.is_ok());
    fixture.assert_file_exists(HISTORY_FILE_NAME);
}

// ============================================================================
// Test Suite 4: Configuration
// ============================================================================

#[test]
fn test_cli_config_excludes_entries() {
    let fixture = TestFixture::new();
    fixture.create_text_file("draft.txt", "d");
    fixture.create_text_file("draft.bak", "b");
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("qxrename.toml");
    fs::write(
        &config_path,
        "[filters.exclude]\nextensions = [\"bak\"]\n",
    )
    .unwrap();

    let result = run_cli_with_config(
        RenameCommand::Apply {
            rule: rule(RenameMode::Replace, "draft", "final"),
        },
        fixture.path(),
        Some(&config_path),
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("final.txt");
    fixture.assert_file_exists("draft.bak");
}

#[test]
fn test_cli_config_defaults_apply_when_rule_is_silent() {
    let fixture = TestFixture::new();
    fixture.create_text_file("report.txt", "r");
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("qxrename.toml");
    fs::write(&config_path, "[defaults]\nmode = \"wildcard\"\n").unwrap();

    let result = run_cli_with_config(
        RenameCommand::Apply {
            rule: RenameRule {
                pattern: "*.txt".to_string(),
                replacement: "backup_*".to_string(),
                ..Default::default()
            },
        },
        fixture.path(),
        Some(&config_path),
    );

    assert!(result.is_ok());
    fixture.assert_file_exists("backup_report");
}

#[test]
fn test_cli_invalid_config_is_an_error() {
    let fixture = TestFixture::new();
    let config_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = config_dir.path().join("qxrename.toml");
    fs::write(&config_path, "[filters.exclude]\nregex = [\"[invalid(\"]\n").unwrap();

    let result = run_cli_with_config(
        RenameCommand::Preview {
            rule: rule(RenameMode::Replace, "a", "b"),
            json: false,
        },
        fixture.path(),
        Some(&config_path),
    );

    assert!(result.is_err());
}
