//! Log output setup for the CLI
//!
//! All library code logs through `tracing` macros; this only installs the
//! subscriber. `RUST_LOG` wins over the verbosity flag when it is set.

use tracing_subscriber::{fmt, EnvFilter};

/// Map `-v` occurrences to a default filter directive
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
