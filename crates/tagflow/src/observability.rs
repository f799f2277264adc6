//! Logging setup for a tagflow run.
//!
//! A run is a single short-lived process, so logging is one JSONL file
//! opened in append mode — no rotation, no background machinery beyond
//! the non-blocking writer. stdout is never a log target: it carries
//! the run summary (or the `--json` payload) and nothing else, so the
//! fallback when no log file can be opened is stderr.
//!
//! The log file is resolved in this order: `TAGFLOW_LOG_PATH` (exact
//! file), `TAGFLOW_LOG_DIR`, the `log_dir` config key, then
//! `tagflow.jsonl` under the XDG data directory.

use anyhow::Result;
use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_LOG_PATH: &str = "TAGFLOW_LOG_PATH";
const ENV_LOG_DIR: &str = "TAGFLOW_LOG_DIR";
const LOG_FILE_NAME: &str = "tagflow.jsonl";

/// Guard that must be held for the lifetime of the application so the
/// non-blocking writer flushes on exit.
pub struct ObservabilityGuard {
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initialize logging for this run.
///
/// `config_log_dir` is the `log_dir` config key, if set. Returns a
/// guard that must be held for the application lifetime.
pub fn init_observability(
    config_log_dir: Option<PathBuf>,
    env_filter: EnvFilter,
) -> Result<ObservabilityGuard> {
    let (writer, guard) = match open_log_file(config_log_dir) {
        Ok(file) => tracing_appender::non_blocking(file),
        Err(err) => {
            // stdout is reserved for run output, so degrade to stderr.
            eprintln!("Warning: {err}. Falling back to stderr logging.");
            tracing_appender::non_blocking(std::io::stderr())
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
        .init();

    tracing::debug!("observability initialized");

    Ok(ObservabilityGuard { _log_guard: guard })
}

/// Build an `EnvFilter` based on CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn open_log_file(config_dir: Option<PathBuf>) -> Result<File, String> {
    let path = resolve_log_path(
        std::env::var_os(ENV_LOG_PATH).map(PathBuf::from),
        std::env::var_os(ENV_LOG_DIR).map(PathBuf::from),
        config_dir,
    )?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("failed to create log directory {}: {e}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("failed to open log file {}: {e}", path.display()))
}

/// Resolve the log file path from the override chain.
fn resolve_log_path(
    path_override: Option<PathBuf>,
    dir_override: Option<PathBuf>,
    config_dir: Option<PathBuf>,
) -> Result<PathBuf, String> {
    if let Some(path) = path_override {
        if path.file_name().is_none() {
            return Err(format!("{ENV_LOG_PATH} must include a file name"));
        }
        return Ok(path);
    }

    let dir = dir_override
        .or(config_dir)
        .or_else(|| {
            directories::ProjectDirs::from("", "", "tagflow")
                .map(|dirs| dirs.data_local_dir().join("logs"))
        })
        .ok_or_else(|| "no log directory available".to_string())?;

    Ok(dir.join(LOG_FILE_NAME))
}
