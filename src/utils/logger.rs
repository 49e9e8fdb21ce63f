//! Logging Infrastructure
//!
//! Structured logging setup built on `tracing`. Console output by default,
//! optional daily-rolling file output for deployments.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize console logging
///
/// `RUST_LOG` overrides the default `info` level. Safe to call more than
/// once; later calls are no-ops.
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize logging with optional daily-rolling file output
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.exists()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "cafe-server");
            let _ = subscriber.with_writer(file_appender).try_init();
            return;
        }
        tracing::warn!("Log directory {} does not exist, logging to console", dir);
    }

    let _ = subscriber.try_init();
}
