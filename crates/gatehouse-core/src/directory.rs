//! External directory traits.
//!
//! The pipeline consumes three independently-scaled services at their
//! interface boundary only: the identity provider (session snapshot), the
//! tenant registry (subdomain existence), and the workspace registry
//! (first-workspace lookup). Each request performs at most two
//! network-bound awaits across these; the pipeline never retries —
//! failures degrade to safe defaults instead.

use crate::error::DirectoryResult;
use crate::request::EdgeRequest;
use crate::session::{PrincipalId, SessionSnapshot, TenantId, WorkspaceId};
use std::future::Future;
use std::pin::Pin;

/// A boxed future, as returned by directory trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The identity provider: session validation.
///
/// `session_snapshot` resolves the caller's session from request
/// credentials (cookies/headers). `Ok(None)` means unauthenticated; an
/// `Err` is always downgraded to unauthenticated by the caller.
pub trait IdentityProvider: Send + Sync + 'static {
    /// Fetches the point-in-time session snapshot for this request.
    fn session_snapshot<'a>(
        &'a self,
        request: &'a EdgeRequest,
    ) -> BoxFuture<'a, DirectoryResult<Option<SessionSnapshot>>>;
}

/// The tenant registry: subdomain existence checks.
///
/// Lookup is keyed by a normalized (lower-cased, port-stripped) subdomain
/// label. An `Err` must never surface as an authorization failure; the
/// tenant stage fails open to normal routing.
pub trait TenantRegistry: Send + Sync + 'static {
    /// Finds an active tenant whose subdomain equals `label`.
    fn find_by_subdomain<'a>(
        &'a self,
        label: &'a str,
    ) -> BoxFuture<'a, DirectoryResult<Option<TenantId>>>;
}

/// The workspace registry: membership lookups.
pub trait WorkspaceRegistry: Send + Sync + 'static {
    /// Finds the principal's first available workspace, if any.
    fn first_workspace_for<'a>(
        &'a self,
        principal: &'a PrincipalId,
    ) -> BoxFuture<'a, DirectoryResult<Option<WorkspaceId>>>;
}
