//! # Gatehouse Telemetry
//!
//! Structured logging and best-effort visitor telemetry for the Gatehouse
//! edge pipeline.
//!
//! Two concerns live here:
//!
//! - [`logging`] - tracing-subscriber setup (JSON for production, pretty
//!   for development)
//! - [`visitor`] - the [`VisitorSink`] trait and fire-and-forget
//!   [`dispatch`], used by the pipeline's telemetry stage; sink failures
//!   never affect a response

#![doc(html_root_url = "https://docs.rs/gatehouse-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;
pub mod visitor;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogConfig};
pub use visitor::{
    dispatch, LogVisitorSink, MemoryVisitorSink, NullVisitorSink, VisitorEvent, VisitorSink,
};
