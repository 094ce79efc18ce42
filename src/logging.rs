//! Tracing setup.
//!
//! The TUI owns the terminal, so it logs to a file; every other command logs
//! to stderr. The level comes from `RUST_LOG` and defaults to `info`.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

pub const DEFAULT_LOG_FILE: &str = "autosales.log";
const DEFAULT_FILTER: &str = "info";

/// Where log events go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Install the global subscriber.
///
/// For a file target the returned guard must be held until exit, otherwise
/// buffered events are lost.
pub fn init(target: LogTarget) -> Result<Option<WorkerGuard>, AppError> {
    let filter = env_filter();

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init()
                .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))?;
            Ok(None)
        }
        LogTarget::File(path) => {
            let (dir, file_name) = split_log_path(&path)?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .try_init()
                .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))?;
            Ok(Some(guard))
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, PathBuf), AppError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::new(2, format!("Invalid log file path: {}", path.display())))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, PathBuf::from(file_name)))
}
