//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (SHA)
//! - [`CommitRecord`] - One entry of a newest-first history snapshot
//! - [`WIP_MESSAGE`] - The checkpoint sentinel shared by commit and scan paths
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use tcr::core::types::{CommitRecord, Oid, WIP_MESSAGE};
//!
//! let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
//! let record = CommitRecord::new(oid, WIP_MESSAGE);
//! assert!(record.is_checkpoint());
//!
//! assert!(Oid::new("not-a-sha").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message of every commit the engine creates.
///
/// External tooling and the squash scan match on this exact string, so it
/// must never change between releases.
pub const WIP_MESSAGE: &str = "[WIP] refactoring";

/// Check whether a commit message marks a checkpoint commit.
///
/// Trailing newlines are ignored because git's message cleanup appends one
/// to messages authored through the command line.
///
/// # Example
///
/// ```
/// use tcr::core::types::is_checkpoint_message;
///
/// assert!(is_checkpoint_message("[WIP] refactoring"));
/// assert!(is_checkpoint_message("[WIP] refactoring\n"));
/// assert!(!is_checkpoint_message("[WIP] refactoring more"));
/// assert!(!is_checkpoint_message("Initial commit"));
/// ```
pub fn is_checkpoint_message(message: &str) -> bool {
    message.trim_end_matches(['\n', '\r']) == WIP_MESSAGE
}

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),
}

/// A Git object identifier (SHA-1 or SHA-256 hex string).
///
/// OIDs are normalized to lowercase for consistency.
///
/// # Example
///
/// ```
/// use tcr::core::types::Oid;
///
/// // Create from hex string (normalized to lowercase)
/// let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
/// assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
///
/// // Get abbreviated form
/// assert_eq!(oid.short(7), "abc123d");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Get an abbreviated form of the OID.
    ///
    /// Returns the first `len` characters. If `len` exceeds the OID length,
    /// returns the full OID.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A commit as seen in a history snapshot.
///
/// Snapshots are read fresh for every decision and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// The commit OID
    pub oid: Oid,
    /// Full commit message
    pub message: String,
}

impl CommitRecord {
    pub fn new(oid: Oid, message: impl Into<String>) -> Self {
        Self {
            oid,
            message: message.into(),
        }
    }

    /// Whether this commit was created by the engine.
    pub fn is_checkpoint(&self) -> bool {
        is_checkpoint_message(&self.message)
    }
}

/// Count the checkpoint commits at the tip of a newest-first history.
///
/// Scanning stops at the first non-checkpoint commit; checkpoints buried
/// below a human-authored commit are not counted.
///
/// # Example
///
/// ```
/// use tcr::core::types::{leading_checkpoints, CommitRecord, Oid, WIP_MESSAGE};
///
/// let oid = |c: char| Oid::new(c.to_string().repeat(40)).unwrap();
/// let history = vec![
///     CommitRecord::new(oid('a'), WIP_MESSAGE),
///     CommitRecord::new(oid('b'), "feature"),
///     CommitRecord::new(oid('c'), WIP_MESSAGE),
/// ];
/// assert_eq!(leading_checkpoints(&history), 1);
/// ```
pub fn leading_checkpoints(history: &[CommitRecord]) -> usize {
    history.iter().take_while(|c| c.is_checkpoint()).count()
}
