//! Logging initialization for SmartGlance.
//!
//! Configures the `tracing` subscriber with level filtering via the
//! `SMARTGLANCE_LOG` environment variable. When the variable is unset,
//! falls back to the level configured in the `[logging]` section of the
//! config file.
//!
//! # Usage
//!
//! ```bash
//! # Default (level from config, "info" out of the box)
//! smartglance run
//!
//! # Debug level
//! SMARTGLANCE_LOG=debug smartglance run
//!
//! # Module-specific filtering
//! SMARTGLANCE_LOG=smartglance::sync=debug,warn smartglance run
//! ```

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::schema::LoggingConfig;
use crate::config::xdg;

/// Initialize the tracing subscriber.
///
/// Reads the `SMARTGLANCE_LOG` environment variable for filter directives.
/// Falls back to the configured log level when the variable is unset or
/// invalid.
///
/// Output goes to the file named in `config.file` (appended, created if
/// missing), or to stderr when that field is empty or the file cannot be
/// opened.
///
/// # Panics
///
/// Panics if a global subscriber has already been set (should only be
/// called once, at startup).
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_env("SMARTGLANCE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    let builder = fmt().with_env_filter(filter).with_target(false);

    if config.file.is_empty() {
        builder.with_writer(std::io::stderr).init();
        return;
    }

    let path = xdg::expand_tilde(&config.file);
    match OpenOptions::new().append(true).create(true).open(&path) {
        Ok(file) => builder.with_ansi(false).with_writer(Arc::new(file)).init(),
        Err(e) => {
            builder.with_writer(std::io::stderr).init();
            tracing::warn!(
                "Could not open log file {}: {}; logging to stderr",
                path.display(),
                e
            );
        }
    }
}
