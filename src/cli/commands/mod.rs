//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Builds the workspace from the context
//! 2. Calls the engine
//! 3. Reports what happened through [`crate::ui::output`]
//!
//! Handlers do NOT touch the repository directly.

mod completion;
mod cycle;
mod squash;

pub use completion::completion;
pub use cycle::cycle;
pub use squash::squash;

use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cli::args::Command;
use crate::engine::{Context, LocalWorkspace, Outcome, Report};
use crate::ui::output::{self, Verbosity};

/// Dispatch a command to its handler.
pub fn dispatch(command: Option<Command>, ctx: &Context) -> Outcome {
    let result = match command {
        None => cycle::cycle(ctx),
        Some(Command::Squash) => squash::squash(ctx),
        Some(Command::Completion { shell }) => {
            completion::completion(shell).map(|()| Outcome::Success)
        }
    };

    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            output::error(format!("{:#}", err));
            Outcome::Error
        }
    }
}

/// Resolve the working directory for this invocation.
pub(crate) fn working_dir(ctx: &Context) -> Result<PathBuf> {
    match &ctx.cwd {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Workspace for this invocation.
pub(crate) fn workspace(ctx: &Context) -> Result<LocalWorkspace> {
    Ok(LocalWorkspace::new(working_dir(ctx)?, ctx.config.clone()))
}

/// Print the error behind an aborted report.
pub(crate) fn report_error<R>(report: &Report<R>) {
    if let Some(err) = &report.error {
        output::error(output::format_error_chain(err));
    }
}

pub(crate) fn verbosity(ctx: &Context) -> Verbosity {
    Verbosity::from_flags(ctx.quiet)
}
