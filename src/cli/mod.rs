//! cli
//!
//! Command-line interface layer for tcr.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install diagnostic logging
//! - Delegate to command handlers
//! - Does NOT perform repository mutations directly
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`], which makes every decision about the repository.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, Shell};

use crate::engine::{self, Outcome};
use crate::logging;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Outcome {
    let cli = Cli::parse_args();
    logging::init(cli.debug);

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        config: cli.config.clone(),
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, &ctx)
}
