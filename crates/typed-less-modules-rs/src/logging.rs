//! Diagnostic logging with `tracing`.
//!
//! User-facing messages go through [`crate::output::Alerts`]; this is for
//! internal diagnostics. Events go to stderr, filtered by `RUST_LOG`
//! (default `warn`). `--verbose` forces `debug`.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Does nothing if one is already installed.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
