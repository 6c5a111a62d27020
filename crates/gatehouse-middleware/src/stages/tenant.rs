//! Tenant subdomain resolution stage.
//!
//! Maps `<label>.<root-domain>` hosts onto the internal tenant route
//! space: the request is rewritten to
//! `/<locale>/<tenant-prefix>/<label><original-path>` without the
//! client seeing the internal layout. The rewrite rides the accumulator
//! as a directive; the chain continues so the authorization gate still
//! runs. Registry failures fail open to normal routing; a broken
//! registry must not take tenant sites down with a hard error.

use crate::Handler;
use gatehouse_config::GatehouseConfig;
use gatehouse_core::{
    split_locale_prefix, BoxFuture, Directive, EdgeRequest, EdgeResponse, Locale, Outcome,
    TenantRegistry, LOCALE_HEADER,
};
use std::sync::Arc;

/// Rewrites tenant-subdomain traffic into the tenant route space.
pub struct TenantResolutionStage {
    root_domain: String,
    tenant_prefix: String,
    default_locale: Locale,
    registry: Arc<dyn TenantRegistry>,
}

impl TenantResolutionStage {
    /// Builds the stage from configuration and a tenant registry.
    #[must_use]
    pub fn new(config: &GatehouseConfig, registry: Arc<dyn TenantRegistry>) -> Self {
        Self {
            root_domain: config.platform.root_domain.clone(),
            tenant_prefix: config.platform.tenant_path_prefix.clone(),
            default_locale: config.locales.default,
            registry,
        }
    }

    /// Extracts the subdomain label, if this host is a tenant candidate.
    fn subdomain_label(&self, request: &EdgeRequest) -> Option<String> {
        let host = request.host_without_port();
        let suffix = format!(".{}", self.root_domain);
        let label = host.strip_suffix(suffix.as_str())?;
        if label.is_empty() || label == "www" {
            return None;
        }
        Some(label.to_string())
    }

    /// Returns `true` when the path already sits inside this tenant's
    /// route space, so rewriting again would stack prefixes.
    fn already_rewritten(&self, stripped_path: &str, label: &str) -> bool {
        let tenant_root = format!("/{}/{label}", self.tenant_prefix);
        stripped_path == tenant_root
            || stripped_path
                .strip_prefix(tenant_root.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl std::fmt::Debug for TenantResolutionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TenantResolutionStage")
            .field("root_domain", &self.root_domain)
            .field("tenant_prefix", &self.tenant_prefix)
            .finish_non_exhaustive()
    }
}

impl Handler for TenantResolutionStage {
    fn name(&self) -> &'static str {
        "tenant_resolution"
    }

    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        mut response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let Some(label) = self.subdomain_label(request) else {
                return Outcome::Continue(response);
            };

            let tenant = match self.registry.find_by_subdomain(&label).await {
                Ok(tenant) => tenant,
                Err(error) => {
                    tracing::warn!(%label, %error, "tenant lookup failed, failing open");
                    return Outcome::Continue(response);
                }
            };
            if tenant.is_none() {
                tracing::debug!(%label, "unknown tenant subdomain, passing through");
                return Outcome::Continue(response);
            }

            let locale = response
                .header(LOCALE_HEADER)
                .and_then(Locale::from_tag)
                .unwrap_or(self.default_locale);
            let (_, stripped) = split_locale_prefix(request.path());
            if self.already_rewritten(&stripped, &label) {
                return Outcome::Continue(response);
            }

            let mut path = format!(
                "/{}/{}/{label}{stripped}",
                locale.as_str(),
                self.tenant_prefix
            );
            if let Some(query) = request.query() {
                path.push('?');
                path.push_str(query);
            }
            tracing::debug!(%label, %path, "tenant rewrite");
            response.set_directive(Directive::Rewrite { path });
            Outcome::Continue(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::fixtures::{FailingTenantRegistry, InMemoryTenantRegistry};

    fn stage(registry: Arc<dyn TenantRegistry>) -> TenantResolutionStage {
        TenantResolutionStage::new(&GatehouseConfig::default(), registry)
    }

    fn acme_stage() -> TenantResolutionStage {
        stage(Arc::new(InMemoryTenantRegistry::with_tenants(["acme"])))
    }

    #[tokio::test]
    async fn test_apex_host_passes_through() {
        let request = EdgeRequest::builder()
            .host("example.com")
            .path("/pricing")
            .build();
        let outcome = acme_stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
    }

    #[tokio::test]
    async fn test_tenant_subdomain_rewrites() {
        let request = EdgeRequest::builder()
            .host("acme.example.com:3000")
            .path("/pricing")
            .build();
        let mut response = EdgeResponse::new();
        response.set_header(LOCALE_HEADER, "en-US");

        let outcome = acme_stage().handle(&request, response).await;
        assert!(!outcome.is_terminal());
        assert_eq!(
            outcome.response().directive(),
            &Directive::Rewrite {
                path: "/en-US/s/acme/pricing".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rewrite_uses_resolved_locale() {
        let request = EdgeRequest::builder()
            .host("acme.example.com")
            .path("/es-ES/contacto")
            .build();
        let mut response = EdgeResponse::new();
        response.set_header(LOCALE_HEADER, "es-ES");

        let outcome = acme_stage().handle(&request, response).await;
        assert_eq!(
            outcome.response().directive(),
            &Directive::Rewrite {
                path: "/es-ES/s/acme/contacto".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_rewrite_preserves_query() {
        let request = EdgeRequest::builder()
            .host("acme.example.com")
            .path("/pricing")
            .query("plan=pro")
            .build();
        let outcome = acme_stage().handle(&request, EdgeResponse::new()).await;
        assert_eq!(
            outcome.response().directive(),
            &Directive::Rewrite {
                path: "/en-US/s/acme/pricing?plan=pro".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_already_rewritten_path_is_idempotent() {
        let request = EdgeRequest::builder()
            .host("acme.example.com")
            .path("/en-US/s/acme/pricing")
            .build();
        let outcome = acme_stage().handle(&request, EdgeResponse::new()).await;
        assert_eq!(outcome.response().directive(), &Directive::Passthrough);
    }

    #[tokio::test]
    async fn test_label_sharing_tenant_prefix_is_not_idempotence() {
        // /s/acmeco is a different tenant's space; rewriting must proceed.
        let request = EdgeRequest::builder()
            .host("acme.example.com")
            .path("/s/acmeco/pricing")
            .build();
        let outcome = acme_stage().handle(&request, EdgeResponse::new()).await;
        assert!(matches!(
            outcome.response().directive(),
            Directive::Rewrite { .. }
        ));
    }

    #[tokio::test]
    async fn test_unknown_subdomain_passes_through() {
        let request = EdgeRequest::builder()
            .host("ghost.example.com")
            .path("/pricing")
            .build();
        let outcome = acme_stage().handle(&request, EdgeResponse::new()).await;
        assert_eq!(outcome.response().directive(), &Directive::Passthrough);
    }

    #[tokio::test]
    async fn test_registry_outage_fails_open() {
        let request = EdgeRequest::builder()
            .host("acme.example.com")
            .path("/pricing")
            .build();
        let outcome = stage(Arc::new(FailingTenantRegistry))
            .handle(&request, EdgeResponse::new())
            .await;
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.response().directive(), &Directive::Passthrough);
    }

    #[tokio::test]
    async fn test_unrelated_domain_passes_through() {
        let request = EdgeRequest::builder()
            .host("acme.other.org")
            .path("/pricing")
            .build();
        let outcome = acme_stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
    }
}
