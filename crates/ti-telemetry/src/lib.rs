//! # Trie Inspector Telemetry
//!
//! Structured logging for the inspector binaries.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ti_telemetry::{init_logging, LoggingConfig};
//!
//! let config = LoggingConfig::from_env().with_file("inspector.log");
//! init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TI_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `TI_JSON_LOGS` | `false` | Emit JSON lines instead of human output |
//! | `TI_LOG_FILE` | unset | Append logs to this file instead of stderr |

mod config;
mod subscriber;

pub use config::LoggingConfig;
pub use subscriber::init_logging;

use thiserror::Error;

/// Logging initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },

    #[error("Failed to open log file {path}: {reason}")]
    LogFile { path: String, reason: String },

    #[error("Failed to install subscriber: {0}")]
    Install(String),
}
