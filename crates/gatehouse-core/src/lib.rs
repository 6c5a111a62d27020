//! # Gatehouse Core
//!
//! Core types and traits for the Gatehouse edge request pipeline.
//!
//! This crate provides the foundational types used throughout Gatehouse:
//!
//! - [`EdgeRequest`] - Immutable per-request view (host, path, headers, cookies)
//! - [`EdgeResponse`] - Response accumulator threaded through the pipeline
//! - [`Outcome`] - Tagged handler result (`Continue` or `Terminal`)
//! - [`SessionSnapshot`] - Per-request authorization snapshot
//! - [`Locale`] - Closed set of supported locale tags
//! - [`IdentityProvider`], [`TenantRegistry`], [`WorkspaceRegistry`] -
//!   external directory traits, consumed at their interface boundary only

#![doc(html_root_url = "https://docs.rs/gatehouse-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod directory;
mod error;
pub mod fixtures;
mod locale;
mod request;
mod response;
mod session;

pub use directory::{BoxFuture, IdentityProvider, TenantRegistry, WorkspaceRegistry};
pub use error::{DirectoryError, DirectoryResult};
pub use locale::{negotiate, split_locale_prefix, Locale, UnknownLocale};
pub use request::{EdgeRequest, EdgeRequestBuilder, RequestId};
pub use response::{Directive, EdgeResponse, Outcome};
pub use session::{PlatformRole, PrincipalId, SessionSnapshot, TenantId, WorkspaceId, WorkspaceRole};

/// The outbound header carrying the resolved locale for the rest of the
/// pipeline and downstream rendering. Set once by the locale stage; every
/// other consumer reads it instead of re-negotiating.
pub const LOCALE_HEADER: &str = "x-app-locale";

/// The outbound header carrying the request correlation id. Stamped by
/// the orchestrator before any stage runs; an inbound `x-request-id` is
/// reused so upstream proxies keep their correlation.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Cookie whose presence (value irrelevant) grants maintenance bypass.
pub const MAINTENANCE_BYPASS_COOKIE: &str = "maintenance_bypass";

/// Cookie carrying the principal's active workspace id. Set only by the
/// authorization gate; httpOnly, `SameSite=Lax`, path `/`.
pub const ACTIVE_WORKSPACE_COOKIE: &str = "active_workspace_id";
