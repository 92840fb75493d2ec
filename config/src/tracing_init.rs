//! Shared tracing setup for binaries.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Keeps the non-blocking file writer alive; hold it until the process exits.
#[must_use = "dropping the guard stops file logging"]
pub struct TracingGuard {
    _file: Option<WorkerGuard>,
}

/// Installs the global subscriber.
///
/// - **RUST_LOG**: filter, e.g. `info`, `vibe=debug`. Falls back to `default_filter`.
/// - **LOG_FILE**: when set, logs are appended to that file (no ANSI) through a
///   non-blocking writer; otherwise they go to stderr.
pub fn init_tracing(
    default_filter: &str,
) -> Result<TracingGuard, Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let log_file = std::env::var_os("LOG_FILE")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);
    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_filter(filter),
            )
            .try_init()?;
        return Ok(TracingGuard { _file: None });
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or("LOG_FILE must name a file")?
        .to_string_lossy()
        .into_owned();
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter),
        )
        .try_init()?;
    tracing::info!(path = %path.display(), "logging to file");
    Ok(TracingGuard {
        _file: Some(guard),
    })
}
