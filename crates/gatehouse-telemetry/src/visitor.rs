//! Best-effort visitor telemetry.
//!
//! The telemetry stage records one [`VisitorEvent`] per request through a
//! [`VisitorSink`]. Recording is fire-and-forget: the event is handed to
//! a spawned task, never awaited on the response's critical path, and a
//! sink failure is logged at warn level and swallowed.

use crate::error::{TelemetryError, TelemetryResult};
use chrono::{DateTime, Utc};
use gatehouse_core::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// One visitor log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitorEvent {
    /// Correlation id stamped by the pipeline, if present.
    pub request_id: Option<String>,
    /// Request host as received.
    pub host: String,
    /// Request path.
    pub path: String,
    /// HTTP method.
    pub method: String,
    /// Resolved locale tag, if the locale stage ran.
    pub locale: Option<String>,
    /// `User-Agent` header, if present.
    pub user_agent: Option<String>,
    /// `Referer` header, if present.
    pub referer: Option<String>,
    /// When the event was captured.
    pub occurred_at: DateTime<Utc>,
}

/// Destination for visitor events.
///
/// Implementations must be cheap to call; the dispatcher already keeps
/// them off the critical path, but a sink that blocks for seconds still
/// wastes a task per request.
pub trait VisitorSink: Send + Sync + 'static {
    /// Records one event.
    fn record<'a>(&'a self, event: VisitorEvent) -> BoxFuture<'a, TelemetryResult<()>>;
}

/// Sink that discards every event. Used when visitor telemetry is
/// disabled.
#[derive(Debug, Clone, Default)]
pub struct NullVisitorSink;

impl VisitorSink for NullVisitorSink {
    fn record<'a>(&'a self, _event: VisitorEvent) -> BoxFuture<'a, TelemetryResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

/// Sink that logs each event as a structured tracing event.
#[derive(Debug, Clone, Default)]
pub struct LogVisitorSink;

impl VisitorSink for LogVisitorSink {
    fn record<'a>(&'a self, event: VisitorEvent) -> BoxFuture<'a, TelemetryResult<()>> {
        Box::pin(async move {
            tracing::info!(
                target: "gatehouse::visitor",
                request_id = event.request_id.as_deref().unwrap_or("-"),
                host = %event.host,
                path = %event.path,
                method = %event.method,
                locale = event.locale.as_deref().unwrap_or("-"),
                user_agent = event.user_agent.as_deref().unwrap_or("-"),
                "visitor"
            );
            Ok(())
        })
    }
}

/// In-memory sink for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryVisitorSink {
    events: Arc<Mutex<Vec<VisitorEvent>>>,
}

impl MemoryVisitorSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<VisitorEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl VisitorSink for MemoryVisitorSink {
    fn record<'a>(&'a self, event: VisitorEvent) -> BoxFuture<'a, TelemetryResult<()>> {
        Box::pin(async move {
            self.events
                .lock()
                .map_err(|_| TelemetryError::Sink("poisoned".to_string()))?
                .push(event);
            Ok(())
        })
    }
}

/// Hands an event to the sink without blocking the caller.
///
/// The write happens on a spawned task; a failure is logged and
/// swallowed. Callers get no confirmation by design.
pub fn dispatch(sink: &Arc<dyn VisitorSink>, event: VisitorEvent) {
    let sink = Arc::clone(sink);
    tokio::spawn(async move {
        if let Err(error) = sink.record(event).await {
            tracing::warn!(%error, "visitor telemetry write failed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event() -> VisitorEvent {
        VisitorEvent {
            request_id: Some("0193e5f0-0000-7000-8000-000000000000".to_string()),
            host: "acme.example.com".to_string(),
            path: "/pricing".to_string(),
            method: "GET".to_string(),
            locale: Some("en-US".to_string()),
            user_agent: Some("test-agent".to_string()),
            referer: None,
            occurred_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_memory_sink_records() {
        let sink = MemoryVisitorSink::new();
        sink.record(sample_event()).await.expect("records");
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].path, "/pricing");
    }

    #[tokio::test]
    async fn test_null_sink_accepts_everything() {
        let sink = NullVisitorSink;
        assert!(sink.record(sample_event()).await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_is_fire_and_forget() {
        let sink = MemoryVisitorSink::new();
        let shared: Arc<dyn VisitorSink> = Arc::new(sink.clone());

        dispatch(&shared, sample_event());

        // The write happens on a spawned task; yield until it lands.
        for _ in 0..100 {
            if !sink.events().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(sink.events().len(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_swallows_sink_errors() {
        #[derive(Debug)]
        struct FailingSink;
        impl VisitorSink for FailingSink {
            fn record<'a>(&'a self, _event: VisitorEvent) -> BoxFuture<'a, TelemetryResult<()>> {
                Box::pin(async { Err(TelemetryError::Sink("disk full".to_string())) })
            }
        }

        let sink: Arc<dyn VisitorSink> = Arc::new(FailingSink);
        // Must not panic or propagate.
        dispatch(&sink, sample_event());
        tokio::task::yield_now().await;
    }
}
