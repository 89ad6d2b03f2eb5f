use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Filter used when the environment does not set one.
const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(Config::LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global tracing subscriber.
///
/// With a log file, records go through a non-blocking appender and the returned guard must be
/// kept alive until the program exits so buffered lines get flushed. Without one, records go to
/// stderr when `use_stderr` is set, and are discarded otherwise since the terminal belongs to
/// the animation.
pub fn init(log_file: Option<&Path>, use_stderr: bool) -> anyhow::Result<Option<WorkerGuard>> {
    match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("log file path {} has no file name", path.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
                .context("failed to install the tracing subscriber")?;
            Ok(Some(guard))
        }
        None if use_stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))
                .context("failed to install the tracing subscriber")?;
            Ok(None)
        }
        None => Ok(None),
    }
}
