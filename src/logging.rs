//! Diagnostic logging setup

use tracing_subscriber::EnvFilter;

/// Filter directives for diagnostics, e.g. `H_LOG=debug`.
pub const LOG_ENV: &str = "H_LOG";

/// Install a stderr subscriber. Quiet (`warn`) unless `H_LOG` says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
