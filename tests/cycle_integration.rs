//! Integration tests for the test && commit || revert cycle.
//!
//! These tests use real git repositories created via tempfile and real child
//! processes, exercising the cycle from configuration to commit or reset.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use tcr::core::types::WIP_MESSAGE;
use tcr::engine::{
    run_cycle, CycleResolution, EngineError, LocalWorkspace, Outcome, SystemRunner,
};
use tcr::git::{Git, Repository};

/// Test fixture that creates a real git repository with a tcr setup.
///
/// The initial commit contains `README.md`, `tcr.json` and two scripts:
/// `pass.sh` exits zero and `fail.sh` prints to both streams and exits one.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a repository whose test command is `test_line`.
    fn new(test_line: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);

        std::fs::write(dir.path().join("README.md"), "# Dummy\n").unwrap();
        std::fs::write(dir.path().join("pass.sh"), "exit 0\n").unwrap();
        std::fs::write(
            dir.path().join("fail.sh"),
            "echo out-line\necho err-line >&2\nexit 1\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("tcr.json"),
            format!("{{\"test\": \"{}\"}}\n", test_line),
        )
        .unwrap();
        run_git(dir.path(), &["add", "."]);
        run_git(dir.path(), &["commit", "-m", "Initial commit"]);

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn workspace(&self) -> LocalWorkspace {
        LocalWorkspace::new(self.path(), None)
    }

    fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    fn write(&self, path: &str, content: &str) {
        std::fs::write(self.path().join(path), content).unwrap();
    }

    fn read(&self, path: &str) -> Option<String> {
        std::fs::read_to_string(self.path().join(path)).ok()
    }

    fn commit_count(&self) -> usize {
        self.git().log().unwrap().len()
    }

    fn head_message(&self) -> String {
        let output = Command::new("git")
            .args(["log", "-1", "--format=%s"])
            .current_dir(self.path())
            .output()
            .expect("git log failed");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

// =============================================================================
// Clean tree
// =============================================================================

#[test]
fn clean_tree_is_skipped() {
    let repo = TestRepo::new("sh fail.sh");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.resolution, CycleResolution::CleanSkip);
    assert_eq!(report.outcome(), Outcome::Success);
    // fail.sh would have reverted and surfaced output had it run
    assert_eq!(report.test_output, None);
    assert_eq!(repo.commit_count(), 1);
}

#[test]
fn ignored_files_do_not_make_tree_dirty() {
    let repo = TestRepo::new("sh pass.sh");
    repo.write(".gitignore", "target/\n");
    run_git(repo.path(), &["add", ".gitignore"]);
    run_git(repo.path(), &["commit", "-m", "ignore target"]);
    std::fs::create_dir(repo.path().join("target")).unwrap();
    repo.write("target/out", "build artifact");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.resolution, CycleResolution::CleanSkip);
}

// =============================================================================
// Passing tests
// =============================================================================

#[test]
fn passing_tests_commit_untracked_file() {
    let repo = TestRepo::new("sh pass.sh");
    repo.write("new", "X");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert!(matches!(report.resolution, CycleResolution::Committed { .. }));
    assert_eq!(report.outcome(), Outcome::Success);
    assert_eq!(report.test_output, None);
    assert_eq!(repo.commit_count(), 2);
    assert_eq!(repo.head_message(), WIP_MESSAGE);
    assert!(repo.git().is_clean().unwrap());
}

#[test]
fn passing_tests_commit_deletion() {
    let repo = TestRepo::new("sh pass.sh");
    std::fs::remove_file(repo.path().join("README.md")).unwrap();

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.outcome(), Outcome::Success);
    assert!(repo.git().is_clean().unwrap());
    assert_eq!(repo.read("README.md"), None);
}

#[test]
fn committed_oid_is_head() {
    let repo = TestRepo::new("sh pass.sh");
    repo.write("README.md", "# Changed\n");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    match report.resolution {
        CycleResolution::Committed { oid } => {
            assert_eq!(Some(oid), repo.git().head_oid().unwrap());
        }
        other => panic!("unexpected resolution: {:?}", other),
    }
}

#[test]
fn arguments_reach_the_test_command() {
    let repo = TestRepo::new("test argument1 = argument1");
    repo.write("new", "X");

    let report = run_cycle(&repo.workspace(), &SystemRunner);
    assert_eq!(report.outcome(), Outcome::Success);

    let repo = TestRepo::new("test argument1 = argument2");
    repo.write("new", "X");

    let report = run_cycle(&repo.workspace(), &SystemRunner);
    assert_eq!(report.outcome(), Outcome::Failure);
}

#[test]
fn test_runs_in_workspace_dir() {
    let repo = TestRepo::new("test -f marker");
    repo.write("marker", "");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.outcome(), Outcome::Success);
}

// =============================================================================
// Failing tests
// =============================================================================

#[test]
fn failing_tests_revert_tracked_change() {
    let repo = TestRepo::new("sh fail.sh");
    repo.write("README.md", "# Broken\n");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.resolution, CycleResolution::Reverted);
    assert_eq!(report.outcome(), Outcome::Failure);
    assert_eq!(repo.read("README.md").as_deref(), Some("# Dummy\n"));
    assert_eq!(repo.commit_count(), 1);
    assert!(repo.git().is_clean().unwrap());
}

#[test]
fn failing_tests_remove_untracked_file() {
    let repo = TestRepo::new("sh fail.sh");
    repo.write("new", "X");

    run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(repo.read("new"), None);
    assert!(repo.git().is_clean().unwrap());
}

#[test]
fn failing_tests_discard_staged_change() {
    let repo = TestRepo::new("sh fail.sh");
    repo.write("README.md", "# Staged\n");
    run_git(repo.path(), &["add", "README.md"]);
    repo.write("staged-new", "Y");
    run_git(repo.path(), &["add", "staged-new"]);

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.resolution, CycleResolution::Reverted);
    assert_eq!(repo.read("README.md").as_deref(), Some("# Dummy\n"));
    assert_eq!(repo.read("staged-new"), None);
    assert!(repo.git().is_clean().unwrap());
    assert_eq!(repo.commit_count(), 1);
}

#[test]
fn failing_tests_remove_untracked_directory() {
    let repo = TestRepo::new("sh fail.sh");
    std::fs::create_dir_all(repo.path().join("src/nested")).unwrap();
    repo.write("src/nested/new.rs", "fn main() {}");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.resolution, CycleResolution::Reverted);
    assert!(!repo.path().join("src/nested/new.rs").exists());
    assert!(repo.git().is_clean().unwrap());
}

#[test]
fn failing_tests_keep_ignored_files() {
    let repo = TestRepo::new("sh fail.sh");
    repo.write(".gitignore", "*.log\n");
    run_git(repo.path(), &["add", ".gitignore"]);
    run_git(repo.path(), &["commit", "-m", "ignore logs"]);
    repo.write("run.log", "keep me");
    repo.write("README.md", "# Broken\n");

    run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(repo.read("run.log").as_deref(), Some("keep me"));
}

#[test]
fn failing_tests_surface_both_streams() {
    let repo = TestRepo::new("sh fail.sh");
    repo.write("new", "X");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    let output = report.test_output.expect("failing output is surfaced");
    assert!(output.contains("out-line"));
    assert!(output.contains("err-line"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn unlaunchable_command_leaves_tree_dirty() {
    let repo = TestRepo::new("./no-such-script.sh");
    repo.write("README.md", "# Pending\n");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.outcome(), Outcome::Error);
    assert!(matches!(report.error, Some(EngineError::Launch(_))));
    assert_eq!(repo.read("README.md").as_deref(), Some("# Pending\n"));
    assert_eq!(repo.commit_count(), 1);
}

#[test]
fn outside_repository_is_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tcr.json"), r#"{"test": "true"}"#).unwrap();

    let report = run_cycle(&LocalWorkspace::new(dir.path(), None), &SystemRunner);

    assert_eq!(report.outcome(), Outcome::Error);
    assert!(matches!(report.error, Some(EngineError::Open(_))));
}

#[test]
fn missing_config_is_error_before_testing() {
    let repo = TestRepo::new("sh pass.sh");
    std::fs::remove_file(repo.path().join("tcr.json")).unwrap();

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.outcome(), Outcome::Error);
    assert!(matches!(report.error, Some(EngineError::Config(_))));
    assert_eq!(repo.commit_count(), 1);
}

#[test]
fn empty_command_is_error() {
    let repo = TestRepo::new("   ");
    repo.write("new", "X");

    let report = run_cycle(&repo.workspace(), &SystemRunner);

    assert_eq!(report.outcome(), Outcome::Error);
    assert!(matches!(report.error, Some(EngineError::Config(_))));
    assert_eq!(repo.read("new").as_deref(), Some("X"));
}

#[test]
fn explicit_config_path() {
    let repo = TestRepo::new("sh fail.sh");
    repo.write("other.json", r#"{"test": "sh pass.sh"}"#);

    let workspace = LocalWorkspace::new(repo.path(), Some("other.json".into()));
    let report = run_cycle(&workspace, &SystemRunner);

    assert_eq!(report.outcome(), Outcome::Success);
    assert_eq!(repo.head_message(), WIP_MESSAGE);
}
