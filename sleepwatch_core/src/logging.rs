//! Tracing setup for the `sleepwatch` binary.
//!
//! Everything is written to stderr. Stdout is reserved for check results
//! and dry-run output, which scripts and cron mail may parse.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directive used when RUST_LOG is unset.
///
/// `--verbose` surfaces the evaluator's per-run summary and the pagination
/// trace from the provider client.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. RUST_LOG wins over `verbose`.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
