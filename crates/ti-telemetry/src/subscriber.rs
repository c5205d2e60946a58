//! Subscriber installation.
//!
//! One `fmt` layer, human or JSON, behind an `EnvFilter`. Output goes to the
//! configured file when there is one and to stderr otherwise.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{LoggingConfig, TelemetryError};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when it parses. Fails if a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(&config.log_level)?;

    let installed = match &config.log_file {
        Some(path) => {
            let writer = Mutex::new(open_log_file(path)?);
            if config.json_logs {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_target(true)
                            .with_ansi(false)
                            .with_writer(writer),
                    )
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_target(true)
                            .with_ansi(false)
                            .with_writer(writer),
                    )
                    .try_init()
            }
        }
        None => {
            if config.json_logs {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_target(true)
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
            } else {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_target(true)
                            .with_writer(std::io::stderr),
                    )
                    .try_init()
            }
        }
    };
    installed.map_err(|e| TelemetryError::Install(e.to_string()))?;

    tracing::debug!(
        level = %config.log_level,
        json_logs = config.json_logs,
        file = ?config.log_file,
        "Logging initialized"
    );
    Ok(())
}

fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| TelemetryError::Filter {
            filter: level.to_string(),
            reason: e.to_string(),
        })
}

fn open_log_file(path: &Path) -> Result<File, TelemetryError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| TelemetryError::LogFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}
