//! squash command - Fold the refactoring commits at the tip into one

use anyhow::Result;

use super::{report_error, verbosity, workspace};
use crate::engine::{run_squash, Context, Outcome, SquashResolution};
use crate::ui::output;

/// Squash the leading run of refactoring commits.
pub fn squash(ctx: &Context) -> Result<Outcome> {
    let workspace = workspace(ctx)?;
    let report = run_squash(&workspace);
    let verbosity = verbosity(ctx);

    match &report.resolution {
        SquashResolution::Squashed { checkpoints, oid } => output::print(
            format!(
                "Squashed {} refactoring commits into {}.",
                checkpoints,
                output::format_oid(oid)
            ),
            verbosity,
        ),
        SquashResolution::DirtyWorktree => output::warn(
            "working tree is not clean, commit or revert your changes first",
            verbosity,
        ),
        SquashResolution::NothingToSquash => {
            output::warn("no refactoring commits at HEAD, nothing to squash", verbosity)
        }
        SquashResolution::SingleCheckpoint => {
            output::warn("only one refactoring commit at HEAD, nothing to squash", verbosity)
        }
        SquashResolution::NoBaseCommit { checkpoints } => output::warn(
            format!(
                "all {} commits are refactoring commits, no commit to squash onto",
                checkpoints
            ),
            verbosity,
        ),
        SquashResolution::Aborted => report_error(&report),
    }

    Ok(report.outcome())
}
