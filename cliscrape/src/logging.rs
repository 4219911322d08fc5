//! Log subscriber setup.

use std::io::{self, IsTerminal};

use scrape::Config;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber.
///
/// RUST_LOG wins when set; otherwise `-v` selects `debug` and the configured
/// `log_filter` applies.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = if verbose {
            "debug".to_string()
        } else {
            Config::load()
                .map(|config| config.log_filter)
                .unwrap_or_else(|_| "warn".to_string())
        };
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    // A subscriber can only be installed once per process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}
