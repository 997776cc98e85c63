use anyhow::{Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, LogLevel};

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "application.log";

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(level: LogLevel) -> String {
    let level = level.as_str();
    format!("{level},tech_events_api={level},sqlx=warn,sea_orm_migration=info")
}

/// Installs the global subscriber: a console layer, plus a daily rolling
/// JSON file under `logs/` when file logging is enabled.
///
/// The returned guard flushes the file writer on drop and must be held
/// until the process exits.
pub fn init(config: &AppConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(config.log_level)));

    let (file_layer, guard) = if config.log_file_enabled {
        let appender = tracing_appender::rolling::daily(LOG_DIR, LOG_FILE_PREFIX);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_ansi(false)
            .with_current_span(true)
            .with_writer(writer);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    if guard.is_some() {
        tracing::info!(dir = LOG_DIR, "file logging enabled");
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_follow_level() {
        assert_eq!(
            default_directives(LogLevel::Debug),
            "debug,tech_events_api=debug,sqlx=warn,sea_orm_migration=info"
        );
        assert!(EnvFilter::try_new(default_directives(LogLevel::Warn)).is_ok());
    }
}
