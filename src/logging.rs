//! `tracing` subscriber setup.
//!
//! Filtering comes from `RUST_LOG` when set, otherwise from `logging.filter`.
//! The terminal surface owns the screen, so logs go to `logging.file` when one
//! is configured.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Calling it again after a subscriber is set is a no-op.
pub fn init_logging(settings: &LoggingSettings) -> io::Result<()> {
    let filter = build_filter(settings);
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = match &settings.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    // A subscriber installed earlier (tests, embedding hosts) wins.
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
