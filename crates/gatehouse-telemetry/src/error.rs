//! Telemetry error types.

use thiserror::Error;

/// Result alias for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Errors produced by the telemetry subsystem.
///
/// None of these ever reach the request path: logging-init errors surface
/// at startup, and sink errors are logged and swallowed by the
/// fire-and-forget dispatcher.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Logging initialization failed.
    #[error("logging initialization failed: {0}")]
    LoggingInit(String),

    /// The visitor sink rejected or failed to persist an event.
    #[error("visitor sink error: {0}")]
    Sink(String),
}
