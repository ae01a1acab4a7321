//! Log setup. The TUI owns the terminal, so events go to a file.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Install a global subscriber appending to `path`. Levels come from
/// `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
pub fn init(path: impl AsRef<Path>) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    tracing::info!(version = crate::VERSION, "logging initialized");
    Ok(())
}
