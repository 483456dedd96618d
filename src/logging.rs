//! File-backed `tracing` setup.
//!
//! The terminal is in raw mode on the alternate screen while the app runs, so
//! events go to `himlen.log` in the data directory instead of stderr.
//! `RUST_LOG` takes precedence over the configured level.

use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub(crate) const LOG_FILE: &str = "himlen.log";

pub(crate) fn filter_for(level: &str) -> EnvFilter {
    let level = if level.trim().is_empty() { "info" } else { level };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub(crate) fn init_logging(log_dir: &Path, level: &str) -> Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let path = log_dir.join(LOG_FILE);
    let log_file =
        std::fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(filter_for(level))
        .with(file_layer)
        .try_init()
        .context("installing tracing subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = filter_for("debug,himlen::scheduler=trace");
        let s = format!("{}", filter);
        assert!(s.contains("debug"));
        assert!(s.contains("himlen::scheduler=trace"));
    }

    #[test]
    fn blank_level_falls_back_to_info() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(format!("{}", filter_for("  ")).contains("info"));
    }
}
