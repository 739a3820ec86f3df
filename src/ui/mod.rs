//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! All user-facing text goes through this module so `--quiet` is honored in
//! one place.

pub mod output;
