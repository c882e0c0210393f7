//! Tracing setup.
//!
//! Logs go to a single (never-rotated) file:
//!   Linux    ~/.local/share/mediagallery/mediagallery.log
//!   macOS    ~/Library/Application Support/mediagallery/mediagallery.log
//!   Windows  %LOCALAPPDATA%\mediagallery\mediagallery.log
//!
//! `RUST_LOG` wins when set; otherwise `[logging] level` from the config,
//! falling back to `info` if that directive does not parse.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

pub const LOG_FILE_NAME: &str = "mediagallery.log";

pub fn log_dir(cfg: &LoggingConfig) -> PathBuf {
    cfg.directory.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_default()
            .join("mediagallery")
    })
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Keep the returned guard alive for the life
/// of the process; dropping it flushes and stops the writer thread.
pub fn init(cfg: &LoggingConfig) -> std::io::Result<WorkerGuard> {
    let dir = log_dir(cfg);
    // rolling::never panics if the file cannot be opened.
    std::fs::create_dir_all(&dir)?;

    let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // try_init: a second call (tests, embedding) must not panic.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&cfg.level))
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init();

    tracing::info!(dir = %dir.display(), "mediagallery logging initialised");
    Ok(guard)
}
