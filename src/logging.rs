use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_PREFIX: &str = "reading-game.log";
const DEFAULT_LOG_DIR: &str = "./logs";

/// Keeps the non-blocking file writer alive; drop it only at shutdown.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    /// Daily rolling files go here when set.
    pub file_dir: Option<PathBuf>,
}

impl LogSettings {
    pub fn from_env(level: &str) -> Self {
        Self::from_parts(
            level,
            crate::config::env_bool("ENABLE_FILE_LOGS"),
            std::env::var("LOG_DIR").ok(),
        )
    }

    fn from_parts(level: &str, file_logs: Option<bool>, log_dir: Option<String>) -> Self {
        let file_dir = file_logs.unwrap_or(false).then(|| {
            let dir = log_dir
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_DIR.to_string());
            PathBuf::from(dir)
        });

        Self {
            level: level.to_string(),
            file_dir,
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_file_writer(dir: &Path) -> std::io::Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
    Ok(tracing_appender::non_blocking(appender))
}

pub fn init_tracing(settings: &LogSettings) -> Option<FileLogGuard> {
    let (file_writer, guard) = match settings.file_dir.as_deref().map(open_file_writer) {
        Some(Ok((writer, guard))) => (Some(writer), Some(guard)),
        Some(Err(err)) => {
            eprintln!("file logging disabled, cannot open log directory: {err}");
            (None, None)
        }
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(env_filter(&settings.level))
        .with(fmt::layer().with_target(true))
        .with(file_layer)
        .init();

    tracing::info!(
        service = env!("CARGO_PKG_NAME"),
        version = env!("CARGO_PKG_VERSION"),
        level = %settings.level,
        file_dir = ?settings.file_dir,
        "tracing initialised"
    );

    guard.map(|guard| FileLogGuard { _guard: guard })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_logs_are_off_unless_enabled() {
        let settings = LogSettings::from_parts("debug", None, Some("/tmp/logs".into()));
        assert_eq!(settings.level, "debug");
        assert_eq!(settings.file_dir, None);

        let settings = LogSettings::from_parts("info", Some(false), None);
        assert_eq!(settings.file_dir, None);
    }

    #[test]
    fn enabled_file_logs_fall_back_to_default_dir() {
        let settings = LogSettings::from_parts("info", Some(true), Some("  ".into()));
        assert_eq!(settings.file_dir, Some(PathBuf::from(DEFAULT_LOG_DIR)));

        let settings = LogSettings::from_parts("info", Some(true), Some("/var/log/game".into()));
        assert_eq!(settings.file_dir, Some(PathBuf::from("/var/log/game")));
    }
}
