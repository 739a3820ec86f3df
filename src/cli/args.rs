//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--config <path>`: Read configuration from this file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tcr - test && commit || revert
///
/// Without a subcommand, runs the configured tests once: on success the
/// working tree is committed as "[WIP] refactoring", on failure it is reset
/// to the last commit.
#[derive(Parser, Debug)]
#[command(name = "tcr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if tcr was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Configuration file (default: tcr.json in the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Squash the refactoring commits at the tip of history into one
    #[command(
        name = "squash",
        long_about = "Squash the refactoring commits at the tip of history into one.\n\n\
            Counts the consecutive \"[WIP] refactoring\" commits starting at HEAD, \
            soft-resets to the commit just before them and commits the combined \
            change as a single \"[WIP] refactoring\" commit.\n\n\
            Refuses to run with uncommitted changes, and does nothing when fewer \
            than two refactoring commits are at the tip.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Several green cycles in a row...
    tcr && tcr && tcr

    # ...then fold them into one commit
    tcr squash"
    )]
    Squash,

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash
    tcr completion bash > ~/.local/share/bash-completion/completions/tcr

    # Zsh
    tcr completion zsh > ~/.zfunc/_tcr

    # Fish
    tcr completion fish > ~/.config/fish/completions/tcr.fish

    # PowerShell
    tcr completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
