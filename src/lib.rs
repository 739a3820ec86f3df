//! tcr - test && commit || revert
//!
//! After every change, run the tests. If they pass, the change is committed
//! as a checkpoint; if they fail, the working tree is reset to the last
//! commit. A run of checkpoint commits can later be squashed into one.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - The cycle and squash state machines
//! - [`core`] - Domain types and configuration
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - User-facing output
//! - [`logging`] - Diagnostic tracing
//!
//! # Correctness Invariants
//!
//! 1. Tests never run against a clean tree
//! 2. A revert only follows a test that ran and failed
//! 3. Checkpoint commits are written and recognized with the same message
//! 4. Squash only folds the run of checkpoints at the tip of history

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod logging;
pub mod ui;
