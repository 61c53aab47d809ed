//! Subscriber setup for the binaries.
//!
//! The TUI owns the terminal, so `nlq` logs to a file; `nlq-ask` logs to stderr.
//! `RUST_LOG` takes precedence over the configured level.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

const FALLBACK_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to open log file at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to install log subscriber: {0}")]
    Install(String),
}

pub fn init_logging(level: &str, target: &LogTarget) -> Result<(), LoggingError> {
    let filter = filter_for(level, std::env::var("RUST_LOG").ok());

    let installed = match target {
        LogTarget::Stderr => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
            .try_init(),
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_target(true)
                .with_ansi(false)
                .try_init()
        }
    };

    installed.map_err(|error| LoggingError::Install(error.to_string()))
}

pub(crate) fn filter_for(level: &str, env_override: Option<String>) -> EnvFilter {
    env_override
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_LEVEL))
}

pub(crate) fn open_log_file(path: &Path) -> Result<File, LoggingError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| LoggingError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::Open {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::{filter_for, open_log_file};

    #[test]
    fn env_directives_override_configured_level() {
        assert_eq!(filter_for("debug", None).to_string(), "debug");
        assert_eq!(
            filter_for("debug", Some("nlq_core=trace".to_string())).to_string(),
            "nlq_core=trace"
        );
    }

    #[test]
    fn log_file_is_created_with_parent_directories_and_appended() {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let path = temp_dir.path().join("nested").join("nlq.log");

        let mut file = open_log_file(&path).expect("log file should open");
        writeln!(file, "first").expect("write should succeed");
        drop(file);
        let mut file = open_log_file(&path).expect("log file should reopen");
        writeln!(file, "second").expect("write should succeed");
        drop(file);

        let contents = std::fs::read_to_string(&path).expect("log file should be readable");
        assert_eq!(contents, "first\nsecond\n");
    }
}
