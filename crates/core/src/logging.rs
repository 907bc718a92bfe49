//! Process-wide `tracing` setup for the indexer and binder front ends.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_DIR_ENV: &str = "QBIND_LOG_DIR";
const DEFAULT_FILTER: &str = "info";

/// Where and how much to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub dir: PathBuf,
    /// Filter used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Mirror records to stderr.
    pub to_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".qbind")
                .join("logs"),
            default_filter: DEFAULT_FILTER.to_string(),
            to_stderr: false,
        }
    }
}

impl LogConfig {
    pub fn from_env(to_stderr: bool) -> Self {
        let mut config = Self {
            to_stderr,
            ..Self::default()
        };
        if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
            config.dir = PathBuf::from(dir);
        }
        config
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// Installs the global subscriber, logging to `<dir>/<component>.<date>`.
///
/// Keep the returned guard alive until exit; dropping it flushes the file
/// writer. A second call leaves the first subscriber in place.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    init_with(component, &LogConfig::from_env(to_stderr))
}

pub fn init_with(component: &str, config: &LogConfig) -> WorkerGuard {
    if let Err(e) = std::fs::create_dir_all(&config.dir) {
        eprintln!("Cannot create log directory {:?}: {e}", config.dir);
    }

    let appender = tracing_appender::rolling::daily(&config.dir, component);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer().with_writer(writer).with_ansi(false);
    let stderr_layer = config.to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact()
    });

    let installed = tracing_subscriber::registry()
        .with(config.filter())
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Logging already initialised, keeping the existing subscriber");
    }

    guard
}
