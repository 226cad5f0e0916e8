use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::model::config::LoggingConfig;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where log output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// The TUI owns the terminal: log to a file, or not at all
    File,
    /// CLI commands: log to stderr
    Stderr,
}

fn build_filter(level: &str) -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Log directory from config, defaulting to `<tmp>/todoey`
pub fn log_dir(logging: &LoggingConfig) -> PathBuf {
    match logging
        .directory
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        Some(d) => PathBuf::from(d),
        None => std::env::temp_dir().join("todoey"),
    }
}

/// Install the global subscriber. Safe to call once per process; later calls
/// are no-ops.
pub fn init_tracing(logging: &LoggingConfig, target: LogTarget) -> Result<(), String> {
    match target {
        LogTarget::Stderr => {
            // CLI output is the product; keep logs to warnings unless asked
            let filter = build_filter("warn");
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time();
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(layer)
                .try_init();
        }
        LogTarget::File => {
            if !logging.file {
                return Ok(());
            }
            let dir = log_dir(logging);
            std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
            let appender = tracing_appender::rolling::never(&dir, "todoey.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            let _ = tracing_subscriber::registry()
                .with(build_filter(&logging.level))
                .with(layer)
                .try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_prefers_config() {
        let mut logging = LoggingConfig::default();
        assert_eq!(log_dir(&logging), std::env::temp_dir().join("todoey"));
        logging.directory = Some("/var/log/todoey".into());
        assert_eq!(log_dir(&logging), PathBuf::from("/var/log/todoey"));
        logging.directory = Some("  ".into());
        assert_eq!(log_dir(&logging), std::env::temp_dir().join("todoey"));
    }
}
