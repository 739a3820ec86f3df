//! logging
//!
//! Diagnostic tracing for the engine.
//!
//! Tracing is for diagnosing tcr itself and goes to stderr. What happened in
//! a cycle is reported to the user through [`crate::ui::output`]; test output
//! never passes through here.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive when `RUST_LOG` is unset.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "tcr=debug"
    } else {
        "warn"
    }
}

/// Install the tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to [`default_directive`]. `--debug` wins
/// over `RUST_LOG`. Calling this twice is harmless: the second install is
/// ignored.
///
/// # Example
/// ```bash
/// RUST_LOG=tcr=trace tcr
/// ```
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::new(default_directive(true))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(false)))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
}
