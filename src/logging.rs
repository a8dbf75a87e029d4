//! Tracing setup. The TUI owns stdout, so events go to a log file instead of
//! the terminal.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
/// Calling this twice is harmless: the second subscriber is dropped.
pub fn init_tracing(config: &Config) -> Result<()> {
    let path = config.log_path()?;
    let file = open_log_file(&path)?;

    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_ok()
    {
        tracing::info!(target: "system", log = %path.display(), "tracing initialized");
    }

    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_log_directory() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.logging.file = Some(dir.path().join("nested").join("app.log"));

        init_tracing(&config).unwrap();
        init_tracing(&config).unwrap();

        assert!(dir.path().join("nested").join("app.log").exists());
    }
}
