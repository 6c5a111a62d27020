//! # Gatehouse
//!
//! **Edge request pipeline for multi-tenant web platforms**
//!
//! Gatehouse sits in front of a multi-tenant application and decides,
//! for every inbound request, what happens before any page renders:
//!
//! - **Maintenance kill-switch** – one flag takes the whole platform
//!   down to a static page, with an operator bypass cookie
//! - **Canonical hosts** – `www.` traffic collapses onto the bare domain
//! - **Locale negotiation** – path prefix, preference cookie, and
//!   `Accept-Language`, resolved once and stamped into a marker header
//! - **Tenant subdomains** – `acme.example.com` rewrites invisibly into
//!   the internal tenant route space
//! - **Session-aware authorization** – login bounces with a safe return
//!   URL, role-gated sub-trees, and workspace attachment
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use gatehouse::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ConfigLoader::new()
//!     .with_optional_file("gatehouse.toml")
//!     .with_env_prefix("GATEHOUSE")
//!     .load()?;
//!
//! let pipeline = Pipeline::new(&config, Directories {
//!     identity: Arc::new(my_identity_provider),
//!     tenants: Arc::new(my_tenant_registry),
//!     workspaces: Arc::new(my_workspace_registry),
//! });
//!
//! let response = pipeline.process(&EdgeRequest::from_parts(&parts)).await;
//! ```
//!
//! ## Architecture
//!
//! The pipeline is a fixed-order chain; stages cannot be disabled or
//! reordered:
//!
//! ```text
//! request ──► maintenance ──► canonical host ──► locale ──► telemetry
//!                 ──► locale fallback* ──► tenant resolution* ──► authorization gate
//! ```
//!
//! Stages marked `*` are conditional: locale fallback runs only on first
//! visits, tenant resolution only on protected paths.

#![doc(html_root_url = "https://docs.rs/gatehouse/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use gatehouse_core as core;

// Re-export configuration types
pub use gatehouse_config as config;

// Re-export the pipeline and stages
pub use gatehouse_middleware as middleware;

// Re-export logging and visitor telemetry
pub use gatehouse_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use gatehouse::prelude::*;
/// ```
pub mod prelude {
    pub use gatehouse_core::{
        Directive, EdgeRequest, EdgeResponse, Locale, Outcome, PlatformRole, SessionSnapshot,
        WorkspaceRole,
    };

    // Directory traits, implemented by the embedding application
    pub use gatehouse_core::{IdentityProvider, TenantRegistry, WorkspaceRegistry};

    // Configuration entry points
    pub use gatehouse_config::{ConfigLoader, GatehouseConfig, RouteClass, RouteManifest};

    // The pipeline itself
    pub use gatehouse_middleware::{Directories, Handler, Pipeline};

    // Logging setup and the visitor sink trait
    pub use gatehouse_telemetry::{init_logging, LogConfig, VisitorEvent, VisitorSink};
}
