//! Tracing subscriber setup
//!
//! Library code only emits `tracing` events. Binaries and tests that want to
//! see them call `init_logging` once at startup.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;
use crate::core::{FrameworkError, FrameworkResult};

/// Prefix of the daily log files
const LOG_FILE_PREFIX: &str = "subagent.log";

/// Install the global subscriber
///
/// `RUST_LOG` overrides the configured level. When a directory is configured
/// the returned guard flushes the file writer on drop and must be held for
/// the life of the process.
pub fn init_logging(config: &LoggingConfig) -> FrameworkResult<Option<WorkerGuard>> {
    let filter = build_filter(&config.level)?;

    let (writer, guard) = match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_ansi(config.directory.is_none());

    let installed = if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init()
    };
    installed.map_err(|e| FrameworkError::other(format!("failed to install logger: {}", e)))?;

    tracing::debug!("[Logging] Initialized at level {}", config.level);
    Ok(guard)
}

/// Filter from `RUST_LOG` if set, otherwise from `level`
pub fn build_filter(level: &str) -> FrameworkResult<EnvFilter> {
    match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) if !directives.is_empty() => parse_filter(&directives),
        _ => parse_filter(level),
    }
}

fn parse_filter(directives: &str) -> FrameworkResult<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        FrameworkError::InvalidConfig(format!("invalid log filter '{}': {}", directives, e))
    })
}
