//! Core pipeline handler trait.
//!
//! Every stage implements [`Handler`]: a pure function of the immutable
//! request plus the response accumulated so far, returning a tagged
//! [`Outcome`]. Stages never share in-process mutable state; everything
//! they need to say to later stages travels in the accumulator.

use gatehouse_core::{BoxFuture, EdgeRequest, EdgeResponse, Outcome};

/// A single stage of the edge pipeline.
///
/// # Invariants
///
/// - A stage MUST NOT mutate the request; it only reads it.
/// - A stage MUST catch its own external-call failures and map them to a
///   safe fallback outcome; `handle` has no error channel on purpose.
/// - A stage returning [`Outcome::Terminal`] ends the chain; the
///   orchestrator will not run anything after it.
///
/// # Example
///
/// ```
/// use gatehouse_core::{BoxFuture, EdgeRequest, EdgeResponse, Outcome};
/// use gatehouse_middleware::Handler;
///
/// struct NoopStage;
///
/// impl Handler for NoopStage {
///     fn name(&self) -> &'static str {
///         "noop"
///     }
///
///     fn handle<'a>(
///         &'a self,
///         _request: &'a EdgeRequest,
///         response: EdgeResponse,
///     ) -> BoxFuture<'a, Outcome> {
///         Box::pin(async move { Outcome::Continue(response) })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Returns the unique name of this stage, used in logs and tests.
    fn name(&self) -> &'static str;

    /// Processes the request against the accumulated response.
    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TagStage {
        name: &'static str,
    }

    impl Handler for TagStage {
        fn name(&self) -> &'static str {
            self.name
        }

        fn handle<'a>(
            &'a self,
            _request: &'a EdgeRequest,
            mut response: EdgeResponse,
        ) -> BoxFuture<'a, Outcome> {
            Box::pin(async move {
                response.set_header("x-visited", self.name);
                Outcome::Continue(response)
            })
        }
    }

    #[tokio::test]
    async fn test_handler_threads_accumulator() {
        let stage = TagStage { name: "first" };
        let request = EdgeRequest::builder().path("/x").build();
        let outcome = stage.handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.response().header("x-visited"), Some("first"));
    }
}
