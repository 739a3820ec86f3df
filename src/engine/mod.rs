//! engine
//!
//! The TCR workflow engine: one test-and-commit-or-revert cycle, and the
//! squash of a run of checkpoint commits.
//!
//! # Architecture
//!
//! The engine decides; collaborators act. Repository access goes through the
//! [`crate::git::Repository`] trait and the test command through
//! [`process::ProcessRunner`], both obtained per invocation from a
//! [`workspace::Workspace`]. Nothing is cached between decisions because
//! the steps being decided mutate the repository.
//!
//! # Outcomes
//!
//! Every invocation ends in exactly one [`Outcome`]:
//!
//! - `Success`: the designed positive result (commit made, clean tree
//!   skipped, squash done)
//! - `Failure`: the workflow rejected the change or declined to squash
//! - `Error`: infrastructure prevented a defined result
//!
//! Callers must be able to tell "the workflow worked and rejected your
//! change" apart from "the workflow itself is broken", so `Failure` and
//! `Error` are never merged inside the engine.
//!
//! # Invariants
//!
//! - Tests never run against a clean tree
//! - A revert only follows a test that ran and failed
//! - A launch failure leaves the working tree untouched
//! - No step is retried
//!
//! # Example
//!
//! ```ignore
//! use tcr::engine::{cycle, process::SystemRunner, workspace::LocalWorkspace};
//!
//! let workspace = LocalWorkspace::new(".", None);
//! let report = cycle::run_cycle(&workspace, &SystemRunner);
//! std::process::exit(report.outcome().exit_code().into());
//! ```

pub mod cycle;
pub mod process;
pub mod squash;
pub mod workspace;

pub use cycle::{run_cycle, CycleResolution, Stage};
pub use process::{ProcessError, ProcessRunner, SystemRunner, TestRun, TestVerdict};
pub use squash::{plan_squash, run_squash, SquashPlan, SquashResolution};
pub use workspace::{LocalWorkspace, StaticWorkspace, Workspace};

use std::path::PathBuf;

use crate::core::config::ConfigError;
use crate::core::types::Oid;
use crate::git::GitError;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Configuration file override.
    pub config: Option<PathBuf>,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

/// Result of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
    Error,
}

impl Outcome {
    /// Process exit status for this outcome.
    ///
    /// `Failure` and `Error` share a status; only the engine distinguishes
    /// them.
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::Failure | Outcome::Error => 1,
        }
    }
}

/// What an invocation did, mapped onto an [`Outcome`].
///
/// Implemented by [`CycleResolution`] and [`SquashResolution`], so each
/// operation can only report results it is able to produce.
pub trait Resolution: std::fmt::Debug {
    /// The resolution for an invocation stopped by an [`EngineError`].
    fn aborted() -> Self;

    fn outcome(&self) -> Outcome;
}

/// Everything the caller learns from one invocation.
#[derive(Debug)]
pub struct Report<R> {
    pub resolution: R,
    /// Combined test output. Present only when the test command ran and
    /// exited non-zero.
    pub test_output: Option<String>,
    /// The error behind an aborted resolution.
    pub error: Option<EngineError>,
}

/// Report of one test && commit || revert cycle.
pub type CycleReport = Report<CycleResolution>;

/// Report of one squash.
pub type SquashReport = Report<SquashResolution>;

impl<R: Resolution> Report<R> {
    pub fn new(resolution: R) -> Self {
        Self {
            resolution,
            test_output: None,
            error: None,
        }
    }

    pub fn aborted(error: EngineError) -> Self {
        Self {
            resolution: R::aborted(),
            test_output: None,
            error: Some(error),
        }
    }

    pub fn with_test_output(mut self, output: Option<String>) -> Self {
        self.test_output = output;
        self
    }

    pub fn outcome(&self) -> Outcome {
        self.resolution.outcome()
    }
}

/// Errors from engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("error on opening git repository: {0}")]
    Open(#[source] GitError),

    #[error("error on reading configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("error on reading worktree status: {0}")]
    Status(#[source] GitError),

    #[error("error on running tests: {0}")]
    Launch(#[from] ProcessError),

    #[error("error on commit: {0}")]
    Commit(#[source] GitError),

    #[error("error on reverting worktree: {0}")]
    Revert(#[source] GitError),

    #[error("error on reading git log: {0}")]
    Log(#[source] GitError),

    #[error("error on resetting to {target}: {source}")]
    Reset {
        target: Oid,
        #[source]
        source: GitError,
    },

    #[error("invalid stage transition: {from:?} -> {to:?}")]
    InvalidTransition { from: Stage, to: Stage },
}
