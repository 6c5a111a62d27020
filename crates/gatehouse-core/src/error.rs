//! Error types for directory (identity/registry) calls.
//!
//! Nothing in the pipeline propagates these to the hosting runtime: every
//! stage downgrades a [`DirectoryError`] into a safe fallback — treat the
//! request as unauthenticated, or pass it through without tenant context.

use thiserror::Error;

/// Result alias for directory calls.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Failure of an external directory call (identity provider, tenant
/// registry, or workspace registry).
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The service could not be reached or returned a transport error.
    #[error("{service} unavailable: {message}")]
    Unavailable {
        /// Which directory service failed.
        service: &'static str,
        /// Transport-level detail, for logs only.
        message: String,
    },

    /// The call timed out.
    #[error("{service} timed out")]
    Timeout {
        /// Which directory service timed out.
        service: &'static str,
    },

    /// The service answered with a payload we could not interpret.
    #[error("{service} returned a malformed response: {message}")]
    Malformed {
        /// Which directory service answered.
        service: &'static str,
        /// Decode-level detail, for logs only.
        message: String,
    },
}

impl DirectoryError {
    /// Creates an unavailability error.
    #[must_use]
    pub fn unavailable(service: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service,
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub const fn timeout(service: &'static str) -> Self {
        Self::Timeout { service }
    }

    /// Creates a malformed-response error.
    #[must_use]
    pub fn malformed(service: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            service,
            message: message.into(),
        }
    }

    /// Returns the name of the failing service, for log fields.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::Unavailable { service, .. }
            | Self::Timeout { service }
            | Self::Malformed { service, .. } => service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let error = DirectoryError::unavailable("identity-provider", "connection refused");
        assert_eq!(
            error.to_string(),
            "identity-provider unavailable: connection refused"
        );
        assert_eq!(error.service(), "identity-provider");
    }

    #[test]
    fn test_timeout_display() {
        let error = DirectoryError::timeout("tenant-registry");
        assert_eq!(error.to_string(), "tenant-registry timed out");
    }
}
