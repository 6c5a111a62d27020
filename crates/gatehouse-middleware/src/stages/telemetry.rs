//! Visitor telemetry stage.
//!
//! Captures one event per admitted request and hands it to the sink via
//! the fire-and-forget dispatcher. This stage never terminates the
//! chain and never delays the response, whatever the sink does.

use crate::Handler;
use chrono::Utc;
use gatehouse_core::{BoxFuture, EdgeRequest, EdgeResponse, Outcome, LOCALE_HEADER, REQUEST_ID_HEADER};
use gatehouse_telemetry::{dispatch, VisitorEvent, VisitorSink};
use std::sync::Arc;

/// Records visitor events off the critical path.
pub struct TelemetryStage {
    sink: Arc<dyn VisitorSink>,
}

impl TelemetryStage {
    /// Builds the stage around a sink.
    #[must_use]
    pub fn new(sink: Arc<dyn VisitorSink>) -> Self {
        Self { sink }
    }
}

impl std::fmt::Debug for TelemetryStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryStage").finish_non_exhaustive()
    }
}

impl Handler for TelemetryStage {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let event = VisitorEvent {
                request_id: response.header(REQUEST_ID_HEADER).map(ToString::to_string),
                host: request.host().to_string(),
                path: request.path().to_string(),
                method: request.method().to_string(),
                locale: response.header(LOCALE_HEADER).map(ToString::to_string),
                user_agent: request.header("user-agent").map(ToString::to_string),
                referer: request.header("referer").map(ToString::to_string),
                occurred_at: Utc::now(),
            };
            dispatch(&self.sink, event);
            Outcome::Continue(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_telemetry::MemoryVisitorSink;

    #[tokio::test]
    async fn test_records_event_and_continues() {
        let sink = MemoryVisitorSink::new();
        let stage = TelemetryStage::new(Arc::new(sink.clone()));

        let request = EdgeRequest::builder()
            .host("acme.example.com")
            .path("/pricing")
            .header("user-agent", "test-agent")
            .build();
        let mut response = EdgeResponse::new();
        response.set_header(LOCALE_HEADER, "es-ES");

        let outcome = stage.handle(&request, response).await;
        assert!(!outcome.is_terminal());

        for _ in 0..100 {
            if !sink.events().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].host, "acme.example.com");
        assert_eq!(events[0].locale.as_deref(), Some("es-ES"));
        assert_eq!(events[0].user_agent.as_deref(), Some("test-agent"));
    }

    #[tokio::test]
    async fn test_sink_failure_never_blocks_response() {
        use gatehouse_telemetry::{TelemetryError, TelemetryResult};

        struct Failing;
        impl VisitorSink for Failing {
            fn record<'a>(&'a self, _event: VisitorEvent) -> BoxFuture<'a, TelemetryResult<()>> {
                Box::pin(async { Err(TelemetryError::Sink("down".to_string())) })
            }
        }

        let stage = TelemetryStage::new(Arc::new(Failing));
        let request = EdgeRequest::builder().path("/pricing").build();
        let outcome = stage.handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
    }
}
