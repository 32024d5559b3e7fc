//! Tracing subscriber initialisation.
//!
//! `splates-core` only *emits* spans and events; hosts that want them on
//! stderr call [`init_logging`] once at startup.
//!
//! # Verbosity mapping
//!
//! | `verbose` | Filter level |
//! |-----------|--------------|
//! | 0         | WARN         |
//! | 1         | INFO         |
//! | 2         | DEBUG        |
//! | 3+        | TRACE        |
//! | `quiet`   | ERROR        |
//!
//! `RUST_LOG` overrides all of the above if set.

use std::io::IsTerminal as _;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Initialise the global tracing subscriber.
///
/// Fails if a subscriber is already registered in this process.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = derive_level(config);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("splates_core={level},splates_adapters={level}"))
    });

    let use_ansi = !config.no_color && std::io::stderr().is_terminal();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

/// Translate the verbosity counter and quiet flag to a level string.
pub fn derive_level(config: &LoggingConfig) -> &'static str {
    if config.quiet {
        return "error";
    }
    match config.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
