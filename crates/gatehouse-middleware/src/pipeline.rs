//! The pipeline orchestrator.
//!
//! Owns the fixed stage order and the `Outcome` reduction: `Terminal`
//! short-circuits the chain, `Continue` threads the accumulator into
//! the next stage. Two stages are conditionally skipped here rather
//! than inside the stage, so the skip condition is visible in one
//! place:
//!
//! - locale fallback runs only when the request carries no locale
//!   preference cookie (first visit);
//! - tenant resolution runs only when the locale-stripped path
//!   classifies as protected.
//!
//! `process` never fails: every stage converts its own external-call
//! errors into a safe fallback outcome.

use crate::stages::{
    AuthorizationGateStage, CanonicalHostStage, LocaleFallbackStage, LocaleStage, MaintenanceStage,
    TelemetryStage, TenantResolutionStage,
};
use crate::Handler;
use gatehouse_config::{CompiledManifest, GatehouseConfig, RouteClass};
use gatehouse_core::{
    split_locale_prefix, EdgeRequest, EdgeResponse, IdentityProvider, Outcome, RequestId,
    TenantRegistry, WorkspaceRegistry, REQUEST_ID_HEADER,
};
use gatehouse_telemetry::{LogVisitorSink, NullVisitorSink, VisitorSink};
use std::sync::Arc;

/// When a stage runs, beyond its position in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageGate {
    /// Runs on every request.
    Always,
    /// Runs only when the locale preference cookie is absent.
    FirstVisit,
    /// Runs only when the locale-stripped path is protected.
    ProtectedPath,
}

/// The external services the pipeline consumes.
///
/// Bundled so `Pipeline::new` stays readable; each service is shared by
/// `Arc` because stages hold them across requests.
#[derive(Clone)]
pub struct Directories {
    /// Session validation.
    pub identity: Arc<dyn IdentityProvider>,
    /// Tenant subdomain lookups.
    pub tenants: Arc<dyn TenantRegistry>,
    /// Workspace membership lookups.
    pub workspaces: Arc<dyn WorkspaceRegistry>,
}

impl std::fmt::Debug for Directories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directories").finish_non_exhaustive()
    }
}

/// The fixed-order edge pipeline.
///
/// # Example
///
/// ```
/// use gatehouse_config::GatehouseConfig;
/// use gatehouse_core::fixtures::{
///     InMemoryTenantRegistry, InMemoryWorkspaceRegistry, StaticIdentityProvider,
/// };
/// use gatehouse_core::EdgeRequest;
/// use gatehouse_middleware::{Directories, Pipeline};
/// use std::sync::Arc;
///
/// # tokio_test::block_on(async {
/// let pipeline = Pipeline::new(
///     &GatehouseConfig::default(),
///     Directories {
///         identity: Arc::new(StaticIdentityProvider::anonymous()),
///         tenants: Arc::new(InMemoryTenantRegistry::with_tenants(["acme"])),
///         workspaces: Arc::new(InMemoryWorkspaceRegistry::empty()),
///     },
/// );
///
/// let request = EdgeRequest::builder()
///     .host("example.com")
///     .path("/pricing")
///     .build();
/// let response = pipeline.process(&request).await;
/// assert_eq!(response.header("x-app-locale"), Some("en-US"));
/// # });
/// ```
pub struct Pipeline {
    stages: Vec<(Box<dyn Handler>, StageGate)>,
    manifest: CompiledManifest,
    preference_cookie: String,
}

impl Pipeline {
    /// Assembles the chain from configuration and directories.
    ///
    /// The visitor sink defaults from configuration: the structured-log
    /// sink when visitor events are enabled, the null sink otherwise.
    /// Use [`Pipeline::with_sink`] to supply a custom sink.
    #[must_use]
    pub fn new(config: &GatehouseConfig, directories: Directories) -> Self {
        let sink: Arc<dyn VisitorSink> = if config.telemetry.visitor_events {
            Arc::new(LogVisitorSink)
        } else {
            Arc::new(NullVisitorSink)
        };
        Self::with_sink(config, directories, sink)
    }

    /// Assembles the chain with an explicit visitor sink.
    #[must_use]
    pub fn with_sink(
        config: &GatehouseConfig,
        directories: Directories,
        sink: Arc<dyn VisitorSink>,
    ) -> Self {
        let stages: Vec<(Box<dyn Handler>, StageGate)> = vec![
            (Box::new(MaintenanceStage::new(config)), StageGate::Always),
            (Box::new(CanonicalHostStage::new(config)), StageGate::Always),
            (Box::new(LocaleStage::new(config)), StageGate::Always),
            (Box::new(TelemetryStage::new(sink)), StageGate::Always),
            (
                Box::new(LocaleFallbackStage::new(config)),
                StageGate::FirstVisit,
            ),
            (
                Box::new(TenantResolutionStage::new(config, directories.tenants)),
                StageGate::ProtectedPath,
            ),
            (
                Box::new(AuthorizationGateStage::new(
                    config,
                    directories.identity,
                    directories.workspaces,
                )),
                StageGate::Always,
            ),
        ];

        Self {
            stages,
            manifest: config.routes.manifest.compile(),
            preference_cookie: config.locales.preference_cookie.clone(),
        }
    }

    /// Names of the stages in chain order, gated or not.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|(stage, _)| stage.name()).collect()
    }

    /// Runs the chain over one request.
    ///
    /// Infallible: the worst any stage can do is continue unchanged.
    pub async fn process(&self, request: &EdgeRequest) -> EdgeResponse {
        let mut response = EdgeResponse::new();

        // Correlation id before any stage runs; reuse an inbound one so
        // upstream proxies keep their trace.
        match request.header(REQUEST_ID_HEADER) {
            Some(inbound) => response.set_header(REQUEST_ID_HEADER, inbound),
            None => response.set_header(REQUEST_ID_HEADER, &RequestId::generate().to_string()),
        }

        for (stage, gate) in &self.stages {
            if !self.gate_allows(*gate, request) {
                tracing::trace!(stage = stage.name(), "stage gated off");
                continue;
            }
            match stage.handle(request, response).await {
                Outcome::Continue(next) => response = next,
                Outcome::Terminal(terminal) => {
                    tracing::debug!(stage = stage.name(), "chain terminated");
                    return terminal;
                }
            }
        }
        response
    }

    fn gate_allows(&self, gate: StageGate, request: &EdgeRequest) -> bool {
        match gate {
            StageGate::Always => true,
            StageGate::FirstVisit => !request.has_cookie(&self.preference_cookie),
            StageGate::ProtectedPath => {
                let (_, stripped) = split_locale_prefix(request.path());
                self.manifest.classify(&stripped) == RouteClass::Protected
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::fixtures::{
        InMemoryTenantRegistry, InMemoryWorkspaceRegistry, StaticIdentityProvider,
    };

    fn anonymous_directories() -> Directories {
        Directories {
            identity: Arc::new(StaticIdentityProvider::anonymous()),
            tenants: Arc::new(InMemoryTenantRegistry::with_tenants(["acme"])),
            workspaces: Arc::new(InMemoryWorkspaceRegistry::empty()),
        }
    }

    #[test]
    fn test_stage_order_is_fixed() {
        let pipeline = Pipeline::new(&GatehouseConfig::default(), anonymous_directories());
        assert_eq!(
            pipeline.stage_names(),
            vec![
                "maintenance",
                "canonical_host",
                "locale",
                "telemetry",
                "locale_fallback",
                "tenant_resolution",
                "authorization_gate",
            ]
        );
    }

    #[tokio::test]
    async fn test_returning_visitor_skips_locale_fallback() {
        let pipeline = Pipeline::new(&GatehouseConfig::default(), anonymous_directories());
        let request = EdgeRequest::builder()
            .host("example.com")
            .path("/pricing")
            .cookie("preferred_locale", "en-US")
            .build();
        let response = pipeline.process(&request).await;
        // No new preference cookie is stamped on a return visit.
        assert!(response.cookie("preferred_locale").is_none());
    }

    #[tokio::test]
    async fn test_first_visit_stamps_preference_cookie() {
        let pipeline = Pipeline::new(&GatehouseConfig::default(), anonymous_directories());
        let request = EdgeRequest::builder()
            .host("example.com")
            .path("/pricing")
            .build();
        let response = pipeline.process(&request).await;
        assert!(response.cookie("preferred_locale").is_some());
    }

    #[tokio::test]
    async fn test_request_id_is_stamped_or_propagated() {
        let pipeline = Pipeline::new(&GatehouseConfig::default(), anonymous_directories());

        let fresh = EdgeRequest::builder()
            .host("example.com")
            .path("/pricing")
            .build();
        let response = pipeline.process(&fresh).await;
        assert!(response.header(REQUEST_ID_HEADER).is_some());

        let traced = EdgeRequest::builder()
            .host("example.com")
            .path("/pricing")
            .header(REQUEST_ID_HEADER, "upstream-id-1")
            .build();
        let response = pipeline.process(&traced).await;
        assert_eq!(response.header(REQUEST_ID_HEADER), Some("upstream-id-1"));
    }
}
