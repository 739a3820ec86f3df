//! engine::cycle
//!
//! One test && commit || revert cycle, as a small state machine:
//!
//! ```text
//! Init -> RepoOpened -> ConfigLoaded -> CleanSkip
//!                                    -> DirtyTest -> Commit
//!                                                 -> Revert
//! ```
//!
//! Every transition is checked against [`Stage::can_advance_to`], so a
//! revert is only reachable after a test that actually ran and failed. A
//! test that cannot be launched aborts in `DirtyTest` and touches nothing.

use tracing::{debug, error, info, instrument};

use super::process::{ProcessRunner, TestVerdict};
use super::workspace::Workspace;
use super::{CycleReport, EngineError, Outcome, Report, Resolution};
use crate::core::types::Oid;
use crate::core::types::WIP_MESSAGE;

/// Position of a cycle in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    RepoOpened,
    ConfigLoaded,
    CleanSkip,
    DirtyTest,
    Commit,
    Revert,
}

impl Stage {
    /// Whether `self -> next` is a legal transition.
    pub fn can_advance_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Init, Stage::RepoOpened)
                | (Stage::RepoOpened, Stage::ConfigLoaded)
                | (Stage::ConfigLoaded, Stage::CleanSkip)
                | (Stage::ConfigLoaded, Stage::DirtyTest)
                | (Stage::DirtyTest, Stage::Commit)
                | (Stage::DirtyTest, Stage::Revert)
        )
    }
}

/// What a cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleResolution {
    /// Nothing to test: the tree was clean.
    CleanSkip,
    /// Tests passed and the tree was committed.
    Committed { oid: Oid },
    /// Tests failed and the tree was reset to HEAD.
    Reverted,
    /// An infrastructure error stopped the cycle.
    Aborted,
}

impl Resolution for CycleResolution {
    fn aborted() -> Self {
        CycleResolution::Aborted
    }

    fn outcome(&self) -> Outcome {
        match self {
            CycleResolution::CleanSkip | CycleResolution::Committed { .. } => Outcome::Success,
            CycleResolution::Reverted => Outcome::Failure,
            CycleResolution::Aborted => Outcome::Error,
        }
    }
}

/// Run one cycle in `workspace`.
///
/// Never fails: infrastructure errors come back as a report with
/// [`CycleResolution::Aborted`].
#[instrument(skip_all, fields(dir = %workspace.dir().display()))]
pub fn run_cycle(workspace: &dyn Workspace, runner: &dyn ProcessRunner) -> CycleReport {
    let mut cycle = Cycle::new();
    let result = cycle.drive(workspace, runner);
    let output = cycle.test_output.take();

    match result {
        Ok(resolution) => Report::new(resolution).with_test_output(output),
        Err(err) => {
            error!(stage = ?cycle.stage, %err, "cycle aborted");
            Report::aborted(err).with_test_output(output)
        }
    }
}

struct Cycle {
    stage: Stage,
    test_output: Option<String>,
}

impl Cycle {
    fn new() -> Self {
        Self {
            stage: Stage::Init,
            test_output: None,
        }
    }

    fn advance(&mut self, next: Stage) -> Result<(), EngineError> {
        if !self.stage.can_advance_to(next) {
            return Err(EngineError::InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        debug!(from = ?self.stage, to = ?next, "stage transition");
        self.stage = next;
        Ok(())
    }

    fn drive(
        &mut self,
        workspace: &dyn Workspace,
        runner: &dyn ProcessRunner,
    ) -> Result<CycleResolution, EngineError> {
        let repo = workspace.open_repository().map_err(EngineError::Open)?;
        self.advance(Stage::RepoOpened)?;

        let config = workspace.load_config()?;
        self.advance(Stage::ConfigLoaded)?;

        if repo.is_clean().map_err(EngineError::Status)? {
            self.advance(Stage::CleanSkip)?;
            info!("worktree is clean, nothing to do");
            return Ok(CycleResolution::CleanSkip);
        }

        self.advance(Stage::DirtyTest)?;
        let run = runner.run(config.test_command(), workspace.dir())?;

        match run.verdict {
            TestVerdict::Passed => {
                self.advance(Stage::Commit)?;
                info!("tests have passed, committing changes");
                let oid = repo.commit_all(WIP_MESSAGE).map_err(EngineError::Commit)?;
                Ok(CycleResolution::Committed { oid })
            }
            TestVerdict::Failed => {
                self.test_output = Some(run.output);
                self.advance(Stage::Revert)?;
                info!(exit_code = ?run.exit_code, "tests have failed, resetting worktree");
                repo.hard_reset().map_err(EngineError::Revert)?;
                Ok(CycleResolution::Reverted)
            }
        }
    }
}
