//! Logging Infrastructure
//!
//! Structured logging for development (text) and production (JSON), with an
//! optional daily rolling file.

use std::path::Path;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "market_server=info,tower_http=info";

/// Initialize the logger with defaults
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Initialize the logger with optional JSON output and file output
///
/// `log_level` overrides `RUST_LOG` when given. A missing `log_dir` is
/// created on demand; if that fails, logs go to stdout.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(true);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if std::fs::create_dir_all(log_path).is_ok() {
            let file_appender = tracing_appender::rolling::daily(log_path, "market-server");
            if json {
                let _ = builder.json().with_writer(file_appender).try_init();
            } else {
                let _ = builder.with_ansi(false).with_writer(file_appender).try_init();
            }
            return;
        }
    }

    if json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
