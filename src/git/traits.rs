//! git::traits
//!
//! The repository gateway: the only capabilities the engine needs from
//! version control.
//!
//! # Design
//!
//! The engine depends on this trait rather than on git2 so its decision
//! procedure can run against [`crate::git::mock::MockRepository`] in tests.
//! Implementations must not cache repository state between calls; every
//! query reflects the repository at the moment it is made.
//!
//! # Example
//!
//! ```
//! use tcr::git::{mock::MockRepository, Repository};
//! use tcr::core::types::WIP_MESSAGE;
//!
//! let repo = MockRepository::with_initial_commit("README.md", "# Dummy");
//! repo.write_file("new", "X");
//!
//! assert!(!repo.is_clean().unwrap());
//! repo.commit_all(WIP_MESSAGE).unwrap();
//! assert!(repo.is_clean().unwrap());
//! assert_eq!(repo.log().unwrap().len(), 2);
//! ```

use super::GitError;
use crate::core::types::{CommitRecord, Oid};

/// Version-control capabilities consumed by the engine.
pub trait Repository {
    /// Whether the working tree and index have no pending changes relative
    /// to HEAD, counting untracked (non-ignored) files as changes.
    fn is_clean(&self) -> Result<bool, GitError>;

    /// Stage every path (modifications, deletions and untracked additions)
    /// and commit with `message`. Either a commit exists afterwards or none
    /// does.
    fn commit_all(&self, message: &str) -> Result<Oid, GitError>;

    /// Reset index and working tree to HEAD, discarding staged and unstaged
    /// modifications and removing untracked files.
    fn hard_reset(&self) -> Result<(), GitError>;

    /// Full history reachable from HEAD, newest first. Empty when HEAD is
    /// unborn.
    fn log(&self) -> Result<Vec<CommitRecord>, GitError>;

    /// Move HEAD (and the branch it points to) to `target`, leaving index
    /// and working tree untouched.
    fn soft_reset(&self, target: &Oid) -> Result<(), GitError>;
}
