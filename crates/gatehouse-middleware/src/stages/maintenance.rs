//! Maintenance kill-switch stage.
//!
//! When the platform-wide maintenance flag is set, every request is
//! rewritten to the maintenance page. Two escape hatches keep the
//! platform operable during an incident: the maintenance page itself
//! (no rewrite loop) and a bypass cookie for operators.

use crate::Handler;
use gatehouse_config::GatehouseConfig;
use gatehouse_core::{
    split_locale_prefix, BoxFuture, Directive, EdgeRequest, EdgeResponse, Outcome,
    MAINTENANCE_BYPASS_COOKIE,
};

/// Rewrites all traffic to the maintenance page while the kill switch is
/// on.
#[derive(Debug, Clone)]
pub struct MaintenanceStage {
    enabled: bool,
    maintenance_page: String,
}

impl MaintenanceStage {
    /// Builds the stage from configuration.
    #[must_use]
    pub fn new(config: &GatehouseConfig) -> Self {
        Self {
            enabled: config.maintenance.enabled,
            maintenance_page: config.routes.maintenance_page.clone(),
        }
    }
}

impl Handler for MaintenanceStage {
    fn name(&self) -> &'static str {
        "maintenance"
    }

    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        mut response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            if !self.enabled {
                return Outcome::Continue(response);
            }
            if request.has_cookie(MAINTENANCE_BYPASS_COOKIE) {
                tracing::debug!(path = %request.path(), "maintenance bypass cookie honored");
                return Outcome::Continue(response);
            }
            let (_, stripped) = split_locale_prefix(request.path());
            if stripped == self.maintenance_page {
                return Outcome::Continue(response);
            }

            tracing::info!(path = %request.path(), "maintenance mode, rewriting");
            response.set_directive(Directive::Rewrite {
                path: self.maintenance_page.clone(),
            });
            Outcome::Terminal(response)
        })
    }
}
