//! Logging Infrastructure
//!
//! `RUST_LOG` wins over the configured level; without either the filter is
//! `menu_server=info,tower_http=info`.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, false, None);
}

/// Directive used when `RUST_LOG` is not set
pub fn default_directive(log_level: Option<&str>) -> String {
    let level = log_level.unwrap_or("info");
    format!("menu_server={level},tower_http={level}")
}

/// Initialize the logger with optional JSON format and file output
///
/// File output is a daily rolling file under `log_dir`, used only when the
/// directory exists.
pub fn init_logger_with_file(log_level: Option<&str>, json: bool, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_appender = log_dir
        .map(Path::new)
        .filter(|p| p.is_dir())
        .map(|p| tracing_appender::rolling::daily(p, "menu-server"));

    match (json, file_appender) {
        (true, Some(appender)) => subscriber.json().with_writer(appender).init(),
        (true, None) => subscriber.json().init(),
        (false, Some(appender)) => subscriber.with_ansi(false).with_writer(appender).init(),
        (false, None) => subscriber.init(),
    }
}
