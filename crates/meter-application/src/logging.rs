//! Tracing setup for the meter process.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// File name prefix of the daily rolling log.
pub const LOG_FILE_PREFIX: &str = "meter.log";

/// Installs the global subscriber: stdout plus a daily rolling file in
/// `logs_dir`.
///
/// `RUST_LOG` overrides `default_level`. Keep the returned guard alive for
/// as long as file logging should keep flushing.
pub fn init_tracing(logs_dir: &Path, default_level: &str) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("Invalid log level '{}'", default_level))?;

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .try_init()
        .context("Global tracing subscriber already installed")?;

    Ok(guard)
}
