//! The seven pipeline stages, one module each, in chain order.

mod authorization;
mod canonical_host;
mod locale;
mod locale_fallback;
mod maintenance;
mod telemetry;
mod tenant;

pub use authorization::AuthorizationGateStage;
pub use canonical_host::CanonicalHostStage;
pub use locale::LocaleStage;
pub use locale_fallback::LocaleFallbackStage;
pub use maintenance::MaintenanceStage;
pub use telemetry::TelemetryStage;
pub use tenant::TenantResolutionStage;
