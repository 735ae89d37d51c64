//! Tracing subscriber initialisation.
//!
//! `splice-core` only emits spans and events; whichever binary embeds the
//! engine calls [`init_logging`] once to install a subscriber.
//!
//! # Verbosity mapping
//!
//! | Verbosity | Filter level |
//! |-----------|--------------|
//! | 0         | WARN         |
//! | 1         | INFO         |
//! | 2         | DEBUG        |
//! | 3+        | TRACE        |
//! | quiet     | ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use splice_core::error::{SpliceError, SpliceResult};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber, writing to stderr.
///
/// Fails if a subscriber is already installed in this process.
pub fn init_logging(verbosity: u8, quiet: bool) -> SpliceResult<()> {
    let level = derive_level(verbosity, quiet);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("splice_core={level},splice_adapters={level}"))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| SpliceError::Configuration {
            message: format!("failed to initialise tracing: {e}"),
        })
}

/// Translate a verbosity counter and quiet flag to a level string.
pub fn derive_level(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
