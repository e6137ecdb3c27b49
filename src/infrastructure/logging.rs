//! Logging setup: console output plus an optional JSON log file

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::application::errors::ConfigError;
use crate::infrastructure::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`. The returned guard must
/// be kept alive for the file writer to flush.
pub fn init(config: &LoggingConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ConfigError::InvalidValue(format!("logging.level: {}", e)))?;

    let console = fmt::layer().with_target(false).with_filter(filter);

    let (file_layer, guard) = match &config.file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(LevelFilter::INFO);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| ConfigError::InvalidValue(format!("logging already initialized: {}", e)))?;

    Ok(guard)
}

fn split_log_path(path: &Path) -> Result<(&Path, &std::ffi::OsStr), ConfigError> {
    let name = path
        .file_name()
        .ok_or_else(|| ConfigError::InvalidValue(format!("logging.file: {} is not a file", path.display())))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok((dir, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bare_file_name() {
        let (dir, name) = split_log_path(Path::new("bot.log")).unwrap();
        assert_eq!(dir, Path::new("."));
        assert_eq!(name, "bot.log");
    }

    #[test]
    fn test_split_nested_path() {
        let (dir, name) = split_log_path(Path::new("logs/bot.log")).unwrap();
        assert_eq!(dir, Path::new("logs"));
        assert_eq!(name, "bot.log");
    }

    #[test]
    fn test_directory_only_path_rejected() {
        assert!(split_log_path(Path::new("/")).is_err());
    }
}
