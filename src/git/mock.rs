//! git::mock
//!
//! In-memory repository for deterministic testing.
//!
//! # Design
//!
//! The mock models a repository as a list of commits, each carrying a full
//! snapshot of file contents, plus a working tree. The tree is clean when it
//! equals the snapshot at HEAD. Soft reset only truncates history, so the
//! squashed content naturally shows up as pending changes, exactly as with a
//! real soft reset.
//!
//! Failure scenarios are configured with [`FailOn`], and every call is
//! recorded as a [`MockOperation`] so tests can assert what the engine did
//! (and did not) do.
//!
//! # Example
//!
//! ```
//! use tcr::git::mock::{FailOn, MockOperation, MockRepository};
//! use tcr::git::Repository;
//!
//! let repo = MockRepository::with_initial_commit("a.txt", "A");
//! repo.write_file("a.txt", "B");
//!
//! repo.hard_reset().unwrap();
//! assert_eq!(repo.read_file("a.txt").as_deref(), Some("A"));
//! assert_eq!(repo.operations(), vec![MockOperation::HardReset]);
//!
//! let failing = MockRepository::new().fail_on(FailOn::Log);
//! assert!(failing.log().is_err());
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{GitError, Repository};
use crate::core::types::{CommitRecord, Oid};

type Snapshot = BTreeMap<String, String>;

/// Mock repository for testing.
///
/// Clones share state, so a test can hand one clone to the engine and keep
/// another for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockRepository {
    inner: Arc<Mutex<MockRepositoryInner>>,
}

#[derive(Debug, Default)]
struct MockRepositoryInner {
    /// Commits, newest first.
    commits: Vec<MockCommit>,
    /// Current working tree contents.
    worktree: Snapshot,
    /// Counter used to mint commit ids.
    next_id: u64,
    fail_on: Option<FailOn>,
    operations: Vec<MockOperation>,
}

#[derive(Debug, Clone)]
struct MockCommit {
    record: CommitRecord,
    snapshot: Snapshot,
}

/// Which operation should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Status,
    CommitAll,
    HardReset,
    Log,
    SoftReset,
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Status,
    CommitAll { message: String },
    HardReset,
    Log,
    SoftReset { target: Oid },
}

impl MockRepository {
    /// Create a repository with no commits and an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with one human-authored commit containing `path`.
    pub fn with_initial_commit(path: &str, content: &str) -> Self {
        let repo = Self::new();
        repo.write_file(path, content);
        repo.seed_commit("a commit message");
        repo
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.inner.lock().unwrap().fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.inner.lock().unwrap().fail_on = None;
    }

    /// Write a file into the working tree.
    pub fn write_file(&self, path: &str, content: &str) {
        self.inner
            .lock()
            .unwrap()
            .worktree
            .insert(path.to_string(), content.to_string());
    }

    /// Delete a file from the working tree.
    pub fn remove_file(&self, path: &str) {
        self.inner.lock().unwrap().worktree.remove(path);
    }

    /// Read a file from the working tree.
    pub fn read_file(&self, path: &str) -> Option<String> {
        self.inner.lock().unwrap().worktree.get(path).cloned()
    }

    /// Commit the working tree as-is without recording an operation.
    ///
    /// Used to build history fixtures.
    pub fn seed_commit(&self, message: &str) -> Oid {
        let mut inner = self.inner.lock().unwrap();
        inner.push_commit(message)
    }

    /// Current history, newest first, without recording an operation.
    pub fn history(&self) -> Vec<CommitRecord> {
        let inner = self.inner.lock().unwrap();
        inner.commits.iter().map(|c| c.record.clone()).collect()
    }

    /// Contents of the commit at HEAD.
    pub fn head_snapshot(&self) -> BTreeMap<String, String> {
        let inner = self.inner.lock().unwrap();
        inner.head_snapshot()
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.inner.lock().unwrap().operations.clone()
    }

    /// Whether any mutating operation was recorded.
    pub fn was_mutated(&self) -> bool {
        self.operations().iter().any(|op| {
            matches!(
                op,
                MockOperation::CommitAll { .. }
                    | MockOperation::HardReset
                    | MockOperation::SoftReset { .. }
            )
        })
    }

    /// Record `op` and return the configured failure for it, if any.
    fn enter(&self, op: MockOperation, kind: FailOn) -> Result<(), GitError> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
        if inner.fail_on == Some(kind) {
            return Err(GitError::Internal {
                message: format!("injected failure on {:?}", kind),
            });
        }
        Ok(())
    }
}

impl MockRepositoryInner {
    fn head_snapshot(&self) -> Snapshot {
        self.commits
            .first()
            .map(|c| c.snapshot.clone())
            .unwrap_or_default()
    }

    fn push_commit(&mut self, message: &str) -> Oid {
        self.next_id += 1;
        let oid = Oid::new(format!("{:040x}", self.next_id)).expect("40 hex digits");
        self.commits.insert(
            0,
            MockCommit {
                record: CommitRecord::new(oid.clone(), message),
                snapshot: self.worktree.clone(),
            },
        );
        oid
    }
}

impl Repository for MockRepository {
    fn is_clean(&self) -> Result<bool, GitError> {
        self.enter(MockOperation::Status, FailOn::Status)?;
        let inner = self.inner.lock().unwrap();
        Ok(inner.worktree == inner.head_snapshot())
    }

    fn commit_all(&self, message: &str) -> Result<Oid, GitError> {
        self.enter(
            MockOperation::CommitAll {
                message: message.to_string(),
            },
            FailOn::CommitAll,
        )?;
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.push_commit(message))
    }

    fn hard_reset(&self) -> Result<(), GitError> {
        self.enter(MockOperation::HardReset, FailOn::HardReset)?;
        let mut inner = self.inner.lock().unwrap();
        if inner.commits.is_empty() {
            return Err(GitError::UnbornHead);
        }
        inner.worktree = inner.head_snapshot();
        Ok(())
    }

    fn log(&self) -> Result<Vec<CommitRecord>, GitError> {
        self.enter(MockOperation::Log, FailOn::Log)?;
        Ok(self.history())
    }

    fn soft_reset(&self, target: &Oid) -> Result<(), GitError> {
        self.enter(
            MockOperation::SoftReset {
                target: target.clone(),
            },
            FailOn::SoftReset,
        )?;
        let mut inner = self.inner.lock().unwrap();
        let position = inner
            .commits
            .iter()
            .position(|c| &c.record.oid == target)
            .ok_or_else(|| GitError::ObjectNotFound {
                oid: target.to_string(),
            })?;
        inner.commits.drain(..position);
        Ok(())
    }
}
