use anyhow::{Context, Result};
use std::io;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::LogLevel;

/// Output format for log lines written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Map the configured severity onto a tracing level.
///
/// `WARNING` becomes `warn`; `CRITICAL` has no tracing counterpart and maps
/// to `error`.
pub const fn tracing_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warning => Level::WARN,
        LogLevel::Error | LogLevel::Critical => Level::ERROR,
    }
}

/// Install the global subscriber.
///
/// # Arguments
/// * `level` - Default level when `RUST_LOG` is not set
/// * `format` - Pretty or JSON output
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(tracing_level(level).into())
        .from_env_lossy();

    match format {
        LogFormat::Json => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter);

            tracing_subscriber::registry()
                .with(stderr_layer)
                .try_init()
                .context("Failed to install JSON log subscriber")?;
        }
        LogFormat::Pretty => {
            let stderr_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_filter(env_filter);

            tracing_subscriber::registry()
                .with(stderr_layer)
                .try_init()
                .context("Failed to install log subscriber")?;
        }
    }

    tracing::debug!(level = %level, format = ?format, "logger initialized");

    Ok(())
}
