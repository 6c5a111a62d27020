//! Configuration section types.
//!
//! Each section is independently defaultable so a configuration file only
//! needs to mention what it changes.

use crate::manifest::RouteManifest;
use gatehouse_core::Locale;
use serde::{Deserialize, Serialize};

/// Platform identity: root domain and tenant routing conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformConfig {
    /// The platform's root domain (no scheme, no port), e.g. `example.com`.
    /// Tenant subdomains are strict children of this domain.
    pub root_domain: String,

    /// Scheme used when building the canonical-host redirect.
    #[serde(default = "default_scheme")]
    pub canonical_scheme: String,

    /// Internal path segment tenant-scoped requests are rewritten under,
    /// producing `/<locale>/<tenant_path_prefix>/<subdomain><path>`.
    #[serde(default = "default_tenant_prefix")]
    pub tenant_path_prefix: String,
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_tenant_prefix() -> String {
    "s".to_string()
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            root_domain: "example.com".to_string(),
            canonical_scheme: default_scheme(),
            tenant_path_prefix: default_tenant_prefix(),
        }
    }
}

/// Locale negotiation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleConfig {
    /// Locales enabled on this deployment. Must include `default`.
    #[serde(default = "default_supported")]
    pub supported: Vec<Locale>,

    /// The fallback locale; paths for it carry no visible prefix.
    #[serde(default = "default_locale")]
    pub default: Locale,

    /// Cookie recording a visitor's locale preference. Its absence marks
    /// a first-time visitor for the locale-fallback stage.
    #[serde(default = "default_locale_cookie")]
    pub preference_cookie: String,
}

fn default_supported() -> Vec<Locale> {
    Locale::ALL.to_vec()
}

const fn default_locale() -> Locale {
    Locale::EnUs
}

fn default_locale_cookie() -> String {
    "preferred_locale".to_string()
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            supported: default_supported(),
            default: default_locale(),
            preference_cookie: default_locale_cookie(),
        }
    }
}

/// Route manifest plus the well-known paths the gate redirects between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutesConfig {
    /// The route manifest (public/auth/protected prefixes, role gates).
    #[serde(default)]
    pub manifest: RouteManifest,

    /// Login page path (locale-stripped).
    #[serde(default = "default_login")]
    pub login_path: String,

    /// Default authenticated landing path (locale-stripped).
    #[serde(default = "default_landing")]
    pub landing_path: String,

    /// New-user onboarding path (locale-stripped).
    #[serde(default = "default_onboarding")]
    pub onboarding_path: String,

    /// Static maintenance page served while the kill-switch is on.
    #[serde(default = "default_maintenance_page")]
    pub maintenance_page: String,
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_landing() -> String {
    "/dashboard".to_string()
}

fn default_onboarding() -> String {
    "/welcome".to_string()
}

fn default_maintenance_page() -> String {
    "/maintenance".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            manifest: RouteManifest::default(),
            login_path: default_login(),
            landing_path: default_landing(),
            onboarding_path: default_onboarding(),
            maintenance_page: default_maintenance_page(),
        }
    }
}

/// The global maintenance kill-switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceConfig {
    /// When `true`, every request without the bypass cookie is rewritten
    /// to the maintenance page.
    #[serde(default)]
    pub enabled: bool,
}

#[allow(clippy::derivable_impls)]
impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self { enabled: false }
    }
}

/// Authorization gate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Diagnostic escape hatch: when `true`, the authorization gate passes
    /// every request through. Never enabled in production.
    #[serde(default)]
    pub dev_bypass: bool,
}

#[allow(clippy::derivable_impls)]
impl Default for AuthConfig {
    fn default() -> Self {
        Self { dev_bypass: false }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Structured JSON, one event per line.
    Json,
    /// Human-readable multi-line output for development.
    Pretty,
}

/// Telemetry section: logging plus the deployment environment label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfigSection {
    /// Log level filter (e.g. `info`, `debug`, `gatehouse=debug`).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Environment label attached to events (`production`, `staging`, ...).
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Whether the visitor telemetry stage records events at all.
    #[serde(default = "default_true")]
    pub visitor_events: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

fn default_environment() -> String {
    "production".to_string()
}

const fn default_true() -> bool {
    true
}

impl Default for TelemetryConfigSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
            environment: default_environment(),
            visitor_events: default_true(),
        }
    }
}
