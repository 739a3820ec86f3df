//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in tcr.
//! All Git interactions flow through this interface, which provides
//! structured results and normalizes errors into typed failure categories.
//!
//! # Architecture
//!
//! The `Git` struct is the only way to interact with a Git repository.
//! No other module should import `git2` directly. This ensures:
//!
//! - Consistent error handling across all Git operations
//! - Strong type guarantees at the boundary
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::BareRepo`]: Repository has no working directory
//! - [`GitError::UnbornHead`]: HEAD does not point at a commit yet
//! - [`GitError::ObjectNotFound`]: Requested commit does not exist
//!
//! # Example
//!
//! ```ignore
//! use tcr::git::{Git, Repository};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! if !git.is_clean()? {
//!     git.commit_all("[WIP] refactoring")?;
//! }
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use super::Repository;
use crate::core::types::{CommitRecord, Oid, TypeError};

/// Signature used when the repository has no `user.name` / `user.email`.
const FALLBACK_NAME: &str = "tcr";
const FALLBACK_EMAIL: &str = "tcr@localhost";

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// HEAD does not point at a commit yet.
    #[error("HEAD has no commits yet")]
    UnbornHead,

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: context.to_string(),
            },
            git2::ErrorCode::UnbornBranch => GitError::UnbornHead,
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            git2::ErrorCode::Locked => GitError::AccessError {
                message: format!("repository is locked: {}", err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
        }
    }
}

/// Summary of working tree status.
///
/// Provides counts of different types of changes in the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Number of staged changes
    pub staged: usize,
    /// Number of unstaged changes to tracked files
    pub unstaged: usize,
    /// Number of untracked files
    pub untracked: usize,
    /// Whether there are unresolved conflicts
    pub has_conflicts: bool,
}

impl WorktreeStatus {
    /// Check if the worktree is completely clean.
    ///
    /// Untracked files count as pending changes: a new file is a candidate
    /// change like any other.
    pub fn is_clean(&self) -> bool {
        self.staged == 0 && self.unstaged == 0 && self.untracked == 0 && !self.has_conflicts
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. All repository
/// reads and writes flow through this interface.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    // =========================================================================
    // Working Tree Status
    // =========================================================================

    /// Get working tree status summary, including untracked files.
    ///
    /// Ignored files are never counted.
    pub fn worktree_status(&self) -> Result<WorktreeStatus, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        let mut result = WorktreeStatus::default();

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_conflicted() {
                result.has_conflicts = true;
            }

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                result.staged += 1;
            }

            if status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
            {
                result.unstaged += 1;
            }

            if status.is_wt_new() {
                result.untracked += 1;
            }
        }

        Ok(result)
    }

    // =========================================================================
    // HEAD
    // =========================================================================

    /// Get HEAD commit OID, or `None` if HEAD is unborn.
    pub fn head_oid(&self) -> Result<Option<Oid>, GitError> {
        match self.head_commit()? {
            Some(commit) => Ok(Some(Oid::new(commit.id().to_string())?)),
            None => Ok(None),
        }
    }

    /// The commit HEAD points at, or `None` in a repository without commits.
    fn head_commit(&self) -> Result<Option<git2::Commit<'_>>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e)
                if e.code() == git2::ErrorCode::UnbornBranch
                    || e.code() == git2::ErrorCode::NotFound =>
            {
                return Ok(None)
            }
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        let commit = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;
        Ok(Some(commit))
    }

    /// Signature for new commits.
    ///
    /// Prefers the repository's configured identity.
    fn signature(&self) -> Result<git2::Signature<'static>, GitError> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(_) => git2::Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)
                .map_err(|e| GitError::from_git2(e, "signature")),
        }
    }

    fn find_commit(&self, oid: &Oid) -> Result<git2::Commit<'_>, GitError> {
        let git_oid =
            git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))?;

        self.repo
            .find_commit(git_oid)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))
    }

    fn record(commit: &git2::Commit<'_>) -> Result<CommitRecord, GitError> {
        Ok(CommitRecord::new(
            Oid::new(commit.id().to_string())?,
            commit.message().unwrap_or(""),
        ))
    }
}

impl Repository for Git {
    fn is_clean(&self) -> Result<bool, GitError> {
        let status = self.worktree_status()?;
        debug!(?status, "worktree status");
        Ok(status.is_clean())
    }

    #[instrument(skip(self))]
    fn commit_all(&self, message: &str) -> Result<Oid, GitError> {
        let mut index = self
            .repo
            .index()
            .map_err(|e| GitError::from_git2(e, "index"))?;

        // add_all picks up new and modified paths, update_all picks up deletions
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .map_err(|e| GitError::from_git2(e, "add"))?;
        index
            .update_all(["*"], None)
            .map_err(|e| GitError::from_git2(e, "add"))?;
        index
            .write()
            .map_err(|e| GitError::from_git2(e, "index"))?;

        let tree_id = index
            .write_tree()
            .map_err(|e| GitError::from_git2(e, "write-tree"))?;
        let tree = self
            .repo
            .find_tree(tree_id)
            .map_err(|e| GitError::from_git2(e, "write-tree"))?;

        let signature = self.signature()?;
        let parent = self.head_commit()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self
            .repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .map_err(|e| GitError::from_git2(e, "commit"))?;

        debug!(oid = %oid, "created commit");
        Ok(Oid::new(oid.to_string())?)
    }

    #[instrument(skip(self))]
    fn hard_reset(&self) -> Result<(), GitError> {
        let head = self.head_commit()?.ok_or(GitError::UnbornHead)?;

        let mut checkout = git2::build::CheckoutBuilder::new();
        checkout.force();
        self.repo
            .reset(head.as_object(), git2::ResetType::Hard, Some(&mut checkout))
            .map_err(|e| GitError::from_git2(e, "reset --hard"))?;

        // A hard reset leaves untracked files alone; sweep them separately.
        let mut sweep = git2::build::CheckoutBuilder::new();
        sweep.force().remove_untracked(true);
        self.repo
            .checkout_head(Some(&mut sweep))
            .map_err(|e| GitError::from_git2(e, "clean"))?;

        Ok(())
    }

    fn log(&self) -> Result<Vec<CommitRecord>, GitError> {
        if self.head_commit()?.is_none() {
            return Ok(Vec::new());
        }

        let mut revwalk = self
            .repo
            .revwalk()
            .map_err(|e| GitError::from_git2(e, "log"))?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(|e| GitError::from_git2(e, "log"))?;
        revwalk
            .push_head()
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let mut history = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| GitError::from_git2(e, "log"))?;
            let commit = self
                .repo
                .find_commit(oid)
                .map_err(|e| GitError::from_git2(e, &oid.to_string()))?;
            history.push(Self::record(&commit)?);
        }

        Ok(history)
    }

    #[instrument(skip(self), fields(target = %target.short(7)))]
    fn soft_reset(&self, target: &Oid) -> Result<(), GitError> {
        let commit = self.find_commit(target)?;
        self.repo
            .reset(commit.as_object(), git2::ResetType::Soft, None)
            .map_err(|e| GitError::from_git2(e, target.as_str()))
    }
}
