//! Tracing subscriber setup.
//!
//! Logs go to stderr by default. With [`LoggingConfig::to_file`] they go to
//! `lumen.log` instead, so a terminal front end keeps its screen.
use std::path::PathBuf;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

const LOG_FILE: &str = "lumen.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence over [`LoggingConfig::directive`]. The
/// returned guard flushes the file writer on drop and must be kept alive for
/// as long as logging is wanted.
pub fn init(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.directive))
        .with_context(|| format!("invalid log directive `{}`", config.directive))?;

    if !config.to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .context("global tracing subscriber already installed")?;
        return Ok(None);
    }

    let directory = log_directory(config);
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("cannot create log directory {}", directory.display()))?;

    let appender = tracing_appender::rolling::never(&directory, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .context("global tracing subscriber already installed")?;

    tracing::info!(file = %directory.join(LOG_FILE).display(), "logging initialized");
    Ok(Some(guard))
}

/// Configured directory, else the platform cache directory, else the
/// system temp directory.
pub fn log_directory(config: &LoggingConfig) -> PathBuf {
    if let Some(directory) = &config.directory {
        return directory.clone();
    }
    directories::ProjectDirs::from("", "", "lumen")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("lumen").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_directory_wins() {
        let config = LoggingConfig {
            directory: Some(PathBuf::from("/var/log/lumen")),
            ..LoggingConfig::default()
        };
        assert_eq!(log_directory(&config), PathBuf::from("/var/log/lumen"));
    }

    #[test]
    fn fallback_directory_ends_in_logs() {
        let directory = log_directory(&LoggingConfig::default());
        assert!(directory.ends_with("logs"));
    }
}
