//! engine::squash
//!
//! Collapse the run of checkpoint commits at the tip of history into one.
//!
//! # Boundary
//!
//! With a newest-first history and `n` leading checkpoint commits, the
//! commits to fold are at indices `0..n` and the commit to reset onto is at
//! index `n`. A soft reset to it keeps index and working tree, so the
//! content of all `n` commits is carried into the replacement commit.
//!
//! ```text
//! index:   0      1      2      3
//!          WIP    WIP    WIP    human   <- n = 3, reset onto index 3
//! ```

use tracing::{error, info, instrument, warn};

use super::workspace::Workspace;
use super::{EngineError, Outcome, Report, Resolution, SquashReport};
use crate::core::types::{leading_checkpoints, CommitRecord, Oid, WIP_MESSAGE};

/// What a squash would do with a given history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquashPlan {
    /// The tip is not a checkpoint.
    NothingToSquash,
    /// Exactly one checkpoint at the tip; it is already squashed.
    SingleCheckpoint,
    /// Every commit is a checkpoint, so no commit precedes the run.
    NoBaseCommit { checkpoints: usize },
    /// Soft-reset to `base` and recommit.
    Squash { base: Oid, checkpoints: usize },
}

/// What a squash did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquashResolution {
    /// `checkpoints` commits were folded into `oid`.
    Squashed { checkpoints: usize, oid: Oid },
    /// Squash refused because of pending changes.
    DirtyWorktree,
    /// No checkpoint commits at the tip.
    NothingToSquash,
    /// Exactly one checkpoint commit at the tip.
    SingleCheckpoint,
    /// Every commit in history is a checkpoint; there is nothing to squash onto.
    NoBaseCommit { checkpoints: usize },
    /// An infrastructure error stopped the squash.
    Aborted,
}

impl Resolution for SquashResolution {
    fn aborted() -> Self {
        SquashResolution::Aborted
    }

    fn outcome(&self) -> Outcome {
        match self {
            SquashResolution::Squashed { .. } => Outcome::Success,
            SquashResolution::DirtyWorktree
            | SquashResolution::NothingToSquash
            | SquashResolution::SingleCheckpoint
            | SquashResolution::NoBaseCommit { .. } => Outcome::Failure,
            SquashResolution::Aborted => Outcome::Error,
        }
    }
}

/// Decide how to squash a newest-first history.
///
/// # Example
///
/// ```
/// use tcr::core::types::{CommitRecord, Oid, WIP_MESSAGE};
/// use tcr::engine::squash::{plan_squash, SquashPlan};
///
/// let oid = |c: char| Oid::new(c.to_string().repeat(40)).unwrap();
/// let history = vec![
///     CommitRecord::new(oid('c'), WIP_MESSAGE),
///     CommitRecord::new(oid('b'), WIP_MESSAGE),
///     CommitRecord::new(oid('a'), "Initial commit"),
/// ];
///
/// assert_eq!(
///     plan_squash(&history),
///     SquashPlan::Squash { base: oid('a'), checkpoints: 2 }
/// );
/// ```
pub fn plan_squash(history: &[CommitRecord]) -> SquashPlan {
    let checkpoints = leading_checkpoints(history);
    match checkpoints {
        0 => SquashPlan::NothingToSquash,
        1 => SquashPlan::SingleCheckpoint,
        n => match history.get(n) {
            Some(base) => SquashPlan::Squash {
                base: base.oid.clone(),
                checkpoints: n,
            },
            None => SquashPlan::NoBaseCommit { checkpoints: n },
        },
    }
}

/// Squash the leading checkpoint commits in `workspace`.
///
/// Never fails: infrastructure errors come back as a report with
/// [`SquashResolution::Aborted`].
#[instrument(skip_all, fields(dir = %workspace.dir().display()))]
pub fn run_squash(workspace: &dyn Workspace) -> SquashReport {
    match squash(workspace) {
        Ok(resolution) => Report::new(resolution),
        Err(err) => {
            error!(%err, "squash aborted");
            Report::aborted(err)
        }
    }
}

fn squash(workspace: &dyn Workspace) -> Result<SquashResolution, EngineError> {
    let repo = workspace.open_repository().map_err(EngineError::Open)?;

    if !repo.is_clean().map_err(EngineError::Status)? {
        warn!("worktree is not clean, no squashing possible");
        return Ok(SquashResolution::DirtyWorktree);
    }

    let history = repo.log().map_err(EngineError::Log)?;

    let (base, checkpoints) = match plan_squash(&history) {
        SquashPlan::NothingToSquash => {
            info!("no refactoring commits, nothing to do");
            return Ok(SquashResolution::NothingToSquash);
        }
        SquashPlan::SingleCheckpoint => {
            info!("only one refactoring commit, nothing to do");
            return Ok(SquashResolution::SingleCheckpoint);
        }
        SquashPlan::NoBaseCommit { checkpoints } => {
            warn!(checkpoints, "history holds only refactoring commits");
            return Ok(SquashResolution::NoBaseCommit { checkpoints });
        }
        SquashPlan::Squash { base, checkpoints } => (base, checkpoints),
    };

    info!(checkpoints, base = %base.short(7), "squashing refactoring commits");
    repo.soft_reset(&base).map_err(|source| EngineError::Reset {
        target: base.clone(),
        source,
    })?;

    let oid = repo.commit_all(WIP_MESSAGE).map_err(EngineError::Commit)?;
    Ok(SquashResolution::Squashed { checkpoints, oid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::engine::workspace::StaticWorkspace;
    use crate::git::mock::{FailOn, MockOperation, MockRepository};
    use crate::git::Repository;

    fn oid(c: char) -> Oid {
        Oid::new(c.to_string().repeat(40)).unwrap()
    }

    fn workspace(repo: &MockRepository) -> StaticWorkspace<MockRepository> {
        // Squash never reads configuration
        StaticWorkspace::new("/work", Some(repo.clone()), None::<Config>)
    }

    /// Repository with one human commit followed by `k` checkpoint commits,
    /// each adding its own file.
    fn history_with_checkpoints(k: usize) -> MockRepository {
        let repo = MockRepository::with_initial_commit("README.md", "# Dummy");
        for i in 0..k {
            repo.write_file(&format!("file{}", i), &format!("content{}", i));
            repo.seed_commit(WIP_MESSAGE);
        }
        repo
    }

    mod plan {
        use super::*;

        #[test]
        fn empty_history() {
            assert_eq!(plan_squash(&[]), SquashPlan::NothingToSquash);
        }

        #[test]
        fn human_tip() {
            let history = vec![
                CommitRecord::new(oid('b'), "human"),
                CommitRecord::new(oid('a'), WIP_MESSAGE),
            ];
            assert_eq!(plan_squash(&history), SquashPlan::NothingToSquash);
        }

        #[test]
        fn single_checkpoint() {
            let history = vec![
                CommitRecord::new(oid('b'), WIP_MESSAGE),
                CommitRecord::new(oid('a'), "human"),
            ];
            assert_eq!(plan_squash(&history), SquashPlan::SingleCheckpoint);
        }

        #[test]
        fn two_checkpoints_reset_onto_index_two() {
            let history = vec![
                CommitRecord::new(oid('c'), WIP_MESSAGE),
                CommitRecord::new(oid('b'), WIP_MESSAGE),
                CommitRecord::new(oid('a'), "human"),
            ];
            assert_eq!(
                plan_squash(&history),
                SquashPlan::Squash {
                    base: oid('a'),
                    checkpoints: 2
                }
            );
        }

        #[test]
        fn buried_checkpoints_are_ignored() {
            let history = vec![
                CommitRecord::new(oid('e'), WIP_MESSAGE),
                CommitRecord::new(oid('d'), WIP_MESSAGE),
                CommitRecord::new(oid('c'), WIP_MESSAGE),
                CommitRecord::new(oid('b'), "human"),
                CommitRecord::new(oid('a'), WIP_MESSAGE),
            ];
            assert_eq!(
                plan_squash(&history),
                SquashPlan::Squash {
                    base: oid('b'),
                    checkpoints: 3
                }
            );
        }

        #[test]
        fn only_checkpoints() {
            let history = vec![
                CommitRecord::new(oid('b'), WIP_MESSAGE),
                CommitRecord::new(oid('a'), WIP_MESSAGE),
            ];
            assert_eq!(
                plan_squash(&history),
                SquashPlan::NoBaseCommit { checkpoints: 2 }
            );
        }
    }

    mod boundary {
        use super::*;

        #[test]
        fn zero_checkpoints_fails_without_change() {
            let repo = history_with_checkpoints(0);
            let before = repo.history();

            let report = run_squash(&workspace(&repo));

            assert_eq!(report.resolution, SquashResolution::NothingToSquash);
            assert_eq!(report.outcome(), Outcome::Failure);
            assert_eq!(repo.history(), before);
            assert!(!repo.was_mutated());
        }

        #[test]
        fn one_checkpoint_fails_without_change() {
            let repo = history_with_checkpoints(1);
            let before = repo.history();

            let report = run_squash(&workspace(&repo));

            assert_eq!(report.resolution, SquashResolution::SingleCheckpoint);
            assert_eq!(report.outcome(), Outcome::Failure);
            assert_eq!(repo.history(), before);
        }

        #[test]
        fn squashes_two_and_more() {
            for k in 2..=5 {
                let repo = history_with_checkpoints(k);
                let len = repo.history().len();
                let human = repo.history()[k].clone();
                let expected_tree = repo.head_snapshot();

                let report = run_squash(&workspace(&repo));

                assert_eq!(report.outcome(), Outcome::Success, "k = {}", k);
                let history = repo.history();
                assert_eq!(history.len(), len - k + 1, "k = {}", k);
                assert!(history[0].is_checkpoint());
                assert_eq!(history[1], human);
                assert_eq!(repo.head_snapshot(), expected_tree);
                assert!(repo.is_clean().unwrap());
                match report.resolution {
                    SquashResolution::Squashed { checkpoints, oid } => {
                        assert_eq!(checkpoints, k);
                        assert_eq!(oid, history[0].oid);
                    }
                    other => panic!("unexpected resolution: {:?}", other),
                }
            }
        }

        #[test]
        fn resets_onto_commit_preceding_run() {
            let repo = history_with_checkpoints(3);
            let base = repo.history()[3].oid.clone();

            run_squash(&workspace(&repo));

            assert!(repo
                .operations()
                .contains(&MockOperation::SoftReset { target: base }));
        }

        #[test]
        fn interleaved_history_only_folds_tip_run() {
            let repo = history_with_checkpoints(1);
            repo.write_file("human", "edit");
            repo.seed_commit("human change");
            repo.write_file("x", "1");
            repo.seed_commit(WIP_MESSAGE);
            repo.write_file("y", "2");
            repo.seed_commit(WIP_MESSAGE);
            // tip: WIP, WIP, human, WIP, initial
            let before = repo.history();

            let report = run_squash(&workspace(&repo));

            assert_eq!(report.outcome(), Outcome::Success);
            let after = repo.history();
            assert_eq!(after.len(), before.len() - 1);
            assert_eq!(after[1..], before[2..]);
        }
    }

    mod preconditions {
        use super::*;

        #[test]
        fn dirty_tree_is_failure() {
            let repo = history_with_checkpoints(3);
            repo.write_file("pending", "work");
            let before = repo.history();

            let report = run_squash(&workspace(&repo));

            assert_eq!(report.resolution, SquashResolution::DirtyWorktree);
            assert_eq!(report.outcome(), Outcome::Failure);
            assert_eq!(repo.history(), before);
            assert!(!repo
                .operations()
                .iter()
                .any(|op| matches!(op, MockOperation::Log)));
        }

        #[test]
        fn all_checkpoints_is_failure() {
            let repo = MockRepository::new();
            repo.write_file("a", "1");
            repo.seed_commit(WIP_MESSAGE);
            repo.write_file("b", "2");
            repo.seed_commit(WIP_MESSAGE);

            let report = run_squash(&workspace(&repo));

            assert_eq!(report.resolution, SquashResolution::NoBaseCommit { checkpoints: 2 });
            assert!(!repo.was_mutated());
        }

        #[test]
        fn config_is_not_required() {
            let repo = history_with_checkpoints(2);
            let report = run_squash(&workspace(&repo));
            assert_eq!(report.outcome(), Outcome::Success);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn missing_repository() {
            let ws: StaticWorkspace<MockRepository> = StaticWorkspace::new("/work", None, None);
            let report = run_squash(&ws);
            assert!(matches!(report.error, Some(EngineError::Open(_))));
        }

        #[test]
        fn log_failure() {
            let repo = history_with_checkpoints(2).fail_on(FailOn::Log);
            let report = run_squash(&workspace(&repo));
            assert_eq!(report.outcome(), Outcome::Error);
            assert!(matches!(report.error, Some(EngineError::Log(_))));
        }

        #[test]
        fn soft_reset_failure() {
            let repo = history_with_checkpoints(2).fail_on(FailOn::SoftReset);
            let before = repo.history();

            let report = run_squash(&workspace(&repo));

            assert_eq!(report.outcome(), Outcome::Error);
            assert!(matches!(report.error, Some(EngineError::Reset { .. })));
            assert_eq!(repo.history(), before);
        }

        #[test]
        fn commit_failure_is_error() {
            let repo = history_with_checkpoints(2).fail_on(FailOn::CommitAll);

            let report = run_squash(&workspace(&repo));

            assert_eq!(report.outcome(), Outcome::Error);
            assert!(matches!(report.error, Some(EngineError::Commit(_))));
        }
    }

    #[test]
    fn uses_shared_sentinel() {
        let repo = history_with_checkpoints(2);
        run_squash(&workspace(&repo));
        assert!(repo.operations().contains(&MockOperation::CommitAll {
            message: WIP_MESSAGE.to_string()
        }));
    }
}
