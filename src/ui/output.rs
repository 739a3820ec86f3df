//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Status messages respect the quiet flag. Errors and the output of a
//! failing test are always shown: the user needs them to fix the change
//! that was just reverted.

use std::fmt::Display;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
}

impl Verbosity {
    /// Create verbosity from the quiet flag.
    ///
    /// `--debug` does not change what is printed here; it only raises the
    /// tracing level (see [`crate::logging`]).
    pub fn from_flags(quiet: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print captured test output verbatim (always shown).
pub fn test_output(output: &str) {
    if output.is_empty() {
        return;
    }
    if output.ends_with('\n') {
        print!("{}", output);
    } else {
        println!("{}", output);
    }
}

/// Format a commit id for display.
pub fn format_oid(oid: &crate::core::types::Oid) -> String {
    oid.short(7).to_string()
}

/// Format an error with its chain of sources, outermost first.
pub fn format_error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Oid;

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(false), Verbosity::Normal);
        assert_eq!(Verbosity::from_flags(true), Verbosity::Quiet);
    }

    #[test]
    fn short_oid() {
        let oid = Oid::new("0123456789abcdef0123456789abcdef01234567").unwrap();
        assert_eq!(format_oid(&oid), "0123456");
    }

    #[test]
    fn error_chain_skips_repeated_causes() {
        #[derive(Debug, thiserror::Error)]
        #[error("outer: {0}")]
        struct Outer(#[source] std::io::Error);

        #[derive(Debug, thiserror::Error)]
        #[error("wrapper")]
        struct Wrapper(#[source] std::io::Error);

        let io = || std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(format_error_chain(&Outer(io())), "outer: gone");
        assert_eq!(format_error_chain(&Wrapper(io())), "wrapper: gone");
    }
}
