//! 日志初始化
//!
//! Console output plus an optional daily-rolling file under the logs
//! directory (`glasspane.YYYY-MM-DD.log`).

use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use glasspane_core::{AppError, AppResult, LoggingSettings, PathProvider};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// 保持非阻塞写入线程存活
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// 获取日志目录
pub fn log_dir(paths: &dyn PathProvider) -> PathBuf {
    paths.logs_dir()
}

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(paths: &dyn PathProvider, settings: &LoggingSettings) -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .map_err(|e| AppError::Config(format!("invalid log level {:?}: {}", settings.level, e)))?;

    let file_layer = if settings.file {
        let dir = log_dir(paths);
        fs::create_dir_all(&dir)?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("glasspane")
            .filename_suffix("log")
            .build(&dir)
            .map_err(|e| AppError::Config(format!("cannot open log file in {:?}: {}", dir, e)))?;
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);

        Some(fmt::layer().with_ansi(false).with_writer(writer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::General(format!("logging already initialized: {}", e)))?;

    tracing::info!(dir = ?log_dir(paths), "Logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glasspane_core::AppDataPathProvider;
    use tempfile::TempDir;

    #[test]
    fn test_logging_writes_into_logs_dir() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let temp = TempDir::new().unwrap();
        let paths = AppDataPathProvider::with_base_dir(temp.path().to_path_buf());

        let bad = LoggingSettings {
            level: "glasspane=loud".to_string(),
            file: true,
        };
        assert!(matches!(init_logging(&paths, &bad), Err(AppError::Config(_))));
        assert!(!log_dir(&paths).exists());

        let settings = LoggingSettings {
            level: "debug".to_string(),
            file: true,
        };
        init_logging(&paths, &settings).unwrap();
        assert!(log_dir(&paths).is_dir());

        // Only one global subscriber per process
        assert!(init_logging(&paths, &settings).is_err());
    }
}
