//! Log subscriber setup. Logs go to stderr; stdout carries only the report.

use std::io;

use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "load_calc=warn",
        1 => "load_calc=info",
        2 => "load_calc=debug",
        _ => "load_calc=trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` wins over `verbosity` when set.
///
/// Calling it again after a subscriber is installed has no effect.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
