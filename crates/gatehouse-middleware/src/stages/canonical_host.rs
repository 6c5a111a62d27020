//! Canonical host stage.
//!
//! Collapses `www.` hosts onto the bare domain with a permanent
//! redirect, preserving path, query string, and any explicit port.

use crate::Handler;
use gatehouse_config::GatehouseConfig;
use gatehouse_core::{BoxFuture, Directive, EdgeRequest, EdgeResponse, Outcome};

const WWW_PREFIX: &str = "www.";

/// Issues a 301 from `www.<host>` to `<host>`.
#[derive(Debug, Clone)]
pub struct CanonicalHostStage {
    scheme: String,
}

impl CanonicalHostStage {
    /// Builds the stage from configuration.
    #[must_use]
    pub fn new(config: &GatehouseConfig) -> Self {
        Self {
            scheme: config.platform.canonical_scheme.clone(),
        }
    }
}

impl Handler for CanonicalHostStage {
    fn name(&self) -> &'static str {
        "canonical_host"
    }

    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        mut response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let host = request.host();
            if host.len() <= WWW_PREFIX.len()
                || !host[..WWW_PREFIX.len()].eq_ignore_ascii_case(WWW_PREFIX)
            {
                return Outcome::Continue(response);
            }

            let bare = &host[WWW_PREFIX.len()..];
            let location = format!("{}://{}{}", self.scheme, bare, request.path_and_query());
            tracing::debug!(from = %host, to = %bare, "stripping www prefix");
            response.set_directive(Directive::Redirect {
                location,
                status: http::StatusCode::MOVED_PERMANENTLY,
            });
            Outcome::Terminal(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> CanonicalHostStage {
        CanonicalHostStage::new(&GatehouseConfig::default())
    }

    #[tokio::test]
    async fn test_bare_host_passes_through() {
        let request = EdgeRequest::builder()
            .host("example.com")
            .path("/pricing")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
    }

    #[tokio::test]
    async fn test_www_host_gets_permanent_redirect() {
        let request = EdgeRequest::builder()
            .host("www.example.com")
            .path("/pricing")
            .query("ref=launch")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(outcome.is_terminal());
        assert_eq!(
            outcome.response().directive(),
            &Directive::Redirect {
                location: "https://example.com/pricing?ref=launch".to_string(),
                status: http::StatusCode::MOVED_PERMANENTLY,
            }
        );
    }

    #[tokio::test]
    async fn test_port_is_preserved() {
        let request = EdgeRequest::builder()
            .host("www.example.com:3000")
            .path("/")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        match outcome.response().directive() {
            Directive::Redirect { location, .. } => {
                assert_eq!(location, "https://example.com:3000/");
            }
            other => panic!("expected redirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_subdomain_named_wwwish_is_untouched() {
        let request = EdgeRequest::builder()
            .host("wwwstatic.example.com")
            .path("/")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
    }
}
