//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads and writes
//! flow through this interface. No other module should import `git2`.
//!
//! We use the `git2` crate exclusively (no shelling out to the git CLI).
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Working tree status
//! - Stage-everything commits
//! - Hard and soft resets
//! - History reads
//!
//! # Invariants
//!
//! - No other module calls git2 directly
//! - The engine sees only the [`Repository`] trait
//! - Nothing is cached; each call reads the repository afresh
//!
//! # Example
//!
//! ```ignore
//! use tcr::git::{Git, Repository};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! for commit in git.log()? {
//!     println!("{} {}", commit.oid.short(7), commit.message);
//! }
//! ```

mod interface;
pub mod mock;
mod traits;

pub use interface::{Git, GitError, WorktreeStatus};
pub use traits::Repository;
