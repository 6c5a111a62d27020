//! Test fixtures for Gatehouse development and testing.
//!
//! This module provides in-memory directory implementations used in tests
//! across the Gatehouse codebase: a static identity provider, a tenant
//! registry backed by a set of labels, a workspace registry backed by a
//! map, and failing variants for error-path tests.
//!
//! # Example
//!
//! ```
//! use gatehouse_core::fixtures::InMemoryTenantRegistry;
//! use gatehouse_core::TenantRegistry;
//!
//! # tokio_test::block_on(async {
//! let registry = InMemoryTenantRegistry::with_tenants(["acme", "cliente"]);
//! let found = registry.find_by_subdomain("acme").await.unwrap();
//! assert!(found.is_some());
//! # });
//! ```

use crate::directory::{BoxFuture, IdentityProvider, TenantRegistry, WorkspaceRegistry};
use crate::error::{DirectoryError, DirectoryResult};
use crate::request::EdgeRequest;
use crate::session::{PrincipalId, SessionSnapshot, TenantId, WorkspaceId};
use std::collections::{HashMap, HashSet};

/// Identity provider that always returns the same snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    snapshot: Option<SessionSnapshot>,
}

impl StaticIdentityProvider {
    /// Provider that reports every request as unauthenticated.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { snapshot: None }
    }

    /// Provider that reports every request as the given session.
    #[must_use]
    pub fn with_session(snapshot: SessionSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn session_snapshot<'a>(
        &'a self,
        _request: &'a EdgeRequest,
    ) -> BoxFuture<'a, DirectoryResult<Option<SessionSnapshot>>> {
        let snapshot = self.snapshot.clone();
        Box::pin(async move { Ok(snapshot) })
    }
}

/// Identity provider that always fails, for outage simulations.
#[derive(Debug, Clone, Default)]
pub struct FailingIdentityProvider;

impl IdentityProvider for FailingIdentityProvider {
    fn session_snapshot<'a>(
        &'a self,
        _request: &'a EdgeRequest,
    ) -> BoxFuture<'a, DirectoryResult<Option<SessionSnapshot>>> {
        Box::pin(async {
            Err(DirectoryError::unavailable(
                "identity-provider",
                "simulated outage",
            ))
        })
    }
}

/// Tenant registry backed by a set of subdomain labels.
///
/// Labels are stored lower-cased; lookups expect the caller to have
/// normalized already (the tenant stage does).
#[derive(Debug, Clone, Default)]
pub struct InMemoryTenantRegistry {
    labels: HashSet<String>,
}

impl InMemoryTenantRegistry {
    /// Creates a registry containing the given subdomain labels.
    #[must_use]
    pub fn with_tenants<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|l| l.into().to_ascii_lowercase())
                .collect(),
        }
    }
}

impl TenantRegistry for InMemoryTenantRegistry {
    fn find_by_subdomain<'a>(
        &'a self,
        label: &'a str,
    ) -> BoxFuture<'a, DirectoryResult<Option<TenantId>>> {
        Box::pin(async move {
            Ok(self
                .labels
                .contains(&label.to_ascii_lowercase())
                .then(|| TenantId(label.to_ascii_lowercase())))
        })
    }
}

/// Tenant registry that always fails, for outage simulations.
#[derive(Debug, Clone, Default)]
pub struct FailingTenantRegistry;

impl TenantRegistry for FailingTenantRegistry {
    fn find_by_subdomain<'a>(
        &'a self,
        _label: &'a str,
    ) -> BoxFuture<'a, DirectoryResult<Option<TenantId>>> {
        Box::pin(async {
            Err(DirectoryError::unavailable(
                "tenant-registry",
                "simulated outage",
            ))
        })
    }
}

/// Workspace registry backed by a principal → workspaces map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspaceRegistry {
    memberships: HashMap<PrincipalId, Vec<WorkspaceId>>,
}

impl InMemoryWorkspaceRegistry {
    /// Creates an empty registry (no principal has any workspace).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds a workspace membership for a principal.
    #[must_use]
    pub fn with_membership(mut self, principal: &str, workspace: &str) -> Self {
        self.memberships
            .entry(PrincipalId::from(principal))
            .or_default()
            .push(WorkspaceId::from(workspace));
        self
    }
}

impl WorkspaceRegistry for InMemoryWorkspaceRegistry {
    fn first_workspace_for<'a>(
        &'a self,
        principal: &'a PrincipalId,
    ) -> BoxFuture<'a, DirectoryResult<Option<WorkspaceId>>> {
        Box::pin(async move {
            Ok(self
                .memberships
                .get(principal)
                .and_then(|list| list.first().cloned()))
        })
    }
}

/// Workspace registry that always fails, for outage simulations.
#[derive(Debug, Clone, Default)]
pub struct FailingWorkspaceRegistry;

impl WorkspaceRegistry for FailingWorkspaceRegistry {
    fn first_workspace_for<'a>(
        &'a self,
        _principal: &'a PrincipalId,
    ) -> BoxFuture<'a, DirectoryResult<Option<WorkspaceId>>> {
        Box::pin(async {
            Err(DirectoryError::unavailable(
                "workspace-registry",
                "simulated outage",
            ))
        })
    }
}
