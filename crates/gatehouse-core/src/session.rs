//! Session and authorization snapshot types.
//!
//! A [`SessionSnapshot`] is fetched fresh from the identity provider once
//! per request. It is the only source of truth for role checks: the gate
//! never trusts client-supplied role data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An authenticated principal's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub String);

/// A tenant's identifier in the tenant registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// A workspace's identifier in the workspace registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub String);

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PrincipalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for TenantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for WorkspaceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Platform-wide role of a principal.
///
/// Role-gated sub-trees of the route manifest require one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformRole {
    /// Ordinary end user.
    User,
    /// Platform administrator.
    Admin,
    /// Platform developer (diagnostic surfaces).
    Developer,
}

impl PlatformRole {
    /// Returns the role name as used in configuration and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Developer => "developer",
        }
    }
}

/// A principal's role inside their active workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    /// Workspace owner.
    Owner,
    /// Workspace administrator.
    Admin,
    /// Ordinary workspace member.
    Member,
}

/// Point-in-time authorization snapshot for one request.
///
/// Fetched once per request from the identity provider; never cached
/// across requests in this layer. `None` at the fetch site denotes
/// "unauthenticated", and an identity-provider error is treated the same
/// way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The authenticated principal.
    pub principal_id: PrincipalId,
    /// The principal's platform-wide role.
    pub platform_role: PlatformRole,
    /// The currently active workspace, if the principal has selected one.
    pub active_workspace_id: Option<WorkspaceId>,
    /// The principal's role within the active workspace.
    pub active_workspace_role: Option<WorkspaceRole>,
}

impl SessionSnapshot {
    /// Creates a snapshot for a principal with no active workspace.
    #[must_use]
    pub fn new(principal_id: impl Into<String>, platform_role: PlatformRole) -> Self {
        Self {
            principal_id: PrincipalId(principal_id.into()),
            platform_role,
            active_workspace_id: None,
            active_workspace_role: None,
        }
    }

    /// Attaches an active workspace to the snapshot.
    #[must_use]
    pub fn with_workspace(mut self, workspace_id: impl Into<String>, role: WorkspaceRole) -> Self {
        self.active_workspace_id = Some(WorkspaceId(workspace_id.into()));
        self.active_workspace_role = Some(role);
        self
    }

    /// Returns `true` if the snapshot carries an active workspace.
    #[must_use]
    pub fn has_workspace(&self) -> bool {
        self.active_workspace_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_without_workspace() {
        let snapshot = SessionSnapshot::new("principal-1", PlatformRole::User);
        assert!(!snapshot.has_workspace());
        assert_eq!(snapshot.platform_role, PlatformRole::User);
    }

    #[test]
    fn test_snapshot_with_workspace() {
        let snapshot = SessionSnapshot::new("principal-1", PlatformRole::Admin)
            .with_workspace("ws-42", WorkspaceRole::Owner);
        assert!(snapshot.has_workspace());
        assert_eq!(
            snapshot.active_workspace_id,
            Some(WorkspaceId("ws-42".to_string()))
        );
        assert_eq!(snapshot.active_workspace_role, Some(WorkspaceRole::Owner));
    }

    #[test]
    fn test_platform_role_serde_names() {
        let json = serde_json::to_string(&PlatformRole::Developer).expect("serializes");
        assert_eq!(json, "\"developer\"");
    }

    #[test]
    fn test_platform_role_as_str() {
        assert_eq!(PlatformRole::User.as_str(), "user");
        assert_eq!(PlatformRole::Admin.as_str(), "admin");
        assert_eq!(PlatformRole::Developer.as_str(), "developer");
    }
}
