//! cycle command - Run the tests, then commit or revert

use anyhow::Result;

use super::{report_error, verbosity, workspace};
use crate::engine::{run_cycle, Context, CycleResolution, Outcome, SystemRunner};
use crate::ui::output;

/// Run one test && commit || revert cycle.
pub fn cycle(ctx: &Context) -> Result<Outcome> {
    let workspace = workspace(ctx)?;
    let report = run_cycle(&workspace, &SystemRunner);
    let verbosity = verbosity(ctx);

    if let Some(test_output) = &report.test_output {
        output::test_output(test_output);
    }

    match &report.resolution {
        CycleResolution::CleanSkip => {
            output::print("Working tree is clean, nothing to test.", verbosity)
        }
        CycleResolution::Committed { oid } => output::print(
            format!("Tests passed, committed {}.", output::format_oid(oid)),
            verbosity,
        ),
        CycleResolution::Reverted => output::print("Tests failed, changes reverted.", verbosity),
        CycleResolution::Aborted => report_error(&report),
    }

    Ok(report.outcome())
}
