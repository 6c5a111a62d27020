//! Route manifest and compiled classifier.
//!
//! The manifest is static configuration: three lists of path prefixes
//! (`public`, `auth`, `protected`) plus role requirements for designated
//! sub-trees of the protected area. Classification always operates on the
//! locale-stripped path.
//!
//! The raw prefix lists are compiled once at startup into a sorted table
//! with binary-search lookup, so per-request classification is
//! O(log n) in the number of prefixes rather than a linear scan.

use gatehouse_core::PlatformRole;
use serde::{Deserialize, Serialize};

/// Classification of a path by the route manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Publicly reachable; the page renders for anyone.
    Public,
    /// Auth-only pages (login, registration) that authenticated users are
    /// redirected away from.
    Auth,
    /// Requires an authenticated session.
    Protected,
}

/// Role requirement for a protected sub-tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGate {
    /// The sub-tree prefix (locale-stripped), e.g. `/admin`.
    pub prefix: String,
    /// Platform roles allowed into the sub-tree.
    pub allowed: Vec<PlatformRole>,
}

/// The raw route manifest as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteManifest {
    /// Prefixes of publicly reachable paths.
    #[serde(default)]
    pub public: Vec<String>,
    /// Prefixes of auth-only paths.
    #[serde(default)]
    pub auth: Vec<String>,
    /// Prefixes of paths requiring an authenticated session.
    #[serde(default)]
    pub protected: Vec<String>,
    /// Role-gated sub-trees within the protected area.
    #[serde(default)]
    pub role_gates: Vec<RoleGate>,
}

impl Default for RouteManifest {
    fn default() -> Self {
        Self {
            public: vec![
                "/pricing".to_string(),
                "/about".to_string(),
                "/maintenance".to_string(),
            ],
            auth: vec![
                "/login".to_string(),
                "/register".to_string(),
                "/forgot-password".to_string(),
            ],
            protected: vec![
                "/dashboard".to_string(),
                "/welcome".to_string(),
                "/admin".to_string(),
                "/dev".to_string(),
            ],
            role_gates: vec![
                RoleGate {
                    prefix: "/admin".to_string(),
                    allowed: vec![PlatformRole::Admin],
                },
                RoleGate {
                    prefix: "/dev".to_string(),
                    allowed: vec![PlatformRole::Developer],
                },
            ],
        }
    }
}

impl RouteManifest {
    /// Compiles the manifest into its lookup form.
    #[must_use]
    pub fn compile(&self) -> CompiledManifest {
        CompiledManifest::new(self)
    }
}

/// One compiled prefix entry.
#[derive(Debug, Clone)]
struct PrefixEntry {
    prefix: String,
    class: RouteClass,
}

/// Compiled, immutable form of the route manifest.
///
/// Prefix matching is segment-aware: `/dev` matches `/dev` and
/// `/dev/tools` but not `/developers`.
#[derive(Debug, Clone)]
pub struct CompiledManifest {
    /// All class prefixes, sorted for binary search.
    entries: Vec<PrefixEntry>,
    /// Role gates sorted by prefix length descending, so the most
    /// specific gate wins.
    gates: Vec<RoleGate>,
}

impl CompiledManifest {
    fn new(manifest: &RouteManifest) -> Self {
        let mut entries: Vec<PrefixEntry> = manifest
            .public
            .iter()
            .map(|p| (p, RouteClass::Public))
            .chain(manifest.auth.iter().map(|p| (p, RouteClass::Auth)))
            .chain(manifest.protected.iter().map(|p| (p, RouteClass::Protected)))
            .map(|(prefix, class)| PrefixEntry {
                prefix: normalize_prefix(prefix),
                class,
            })
            .collect();
        entries.sort_by(|a, b| a.prefix.cmp(&b.prefix));

        let mut gates: Vec<RoleGate> = manifest
            .role_gates
            .iter()
            .map(|gate| RoleGate {
                prefix: normalize_prefix(&gate.prefix),
                allowed: gate.allowed.clone(),
            })
            .collect();
        gates.sort_by_key(|gate| std::cmp::Reverse(gate.prefix.len()));

        Self { entries, gates }
    }

    /// Classifies a locale-stripped path.
    ///
    /// Each segment-ancestor of the path (longest first) is binary-searched
    /// against the sorted prefix table, so classification costs
    /// O(depth · log n) instead of a linear scan over every prefix.
    ///
    /// Paths matching no manifest prefix are treated as public: the page
    /// renders its own unauthenticated UI or 404s downstream.
    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        for ancestor in segment_ancestors(path) {
            if let Ok(index) = self
                .entries
                .binary_search_by(|entry| entry.prefix.as_str().cmp(ancestor))
            {
                return self.entries[index].class;
            }
        }
        RouteClass::Public
    }

    /// Returns the role gate covering a locale-stripped path, if any.
    #[must_use]
    pub fn role_gate(&self, path: &str) -> Option<&RoleGate> {
        self.gates
            .iter()
            .find(|gate| prefix_matches(&gate.prefix, path))
    }
}

/// Ensures a prefix starts with `/` and carries no trailing slash.
fn normalize_prefix(prefix: &str) -> String {
    let mut normalized = if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{prefix}")
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Yields the path itself and every segment-ancestor, longest first:
/// `/a/b/c` → `/a/b/c`, `/a/b`, `/a`.
fn segment_ancestors(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.trim_end_matches('/');
    let full = if trimmed.is_empty() { "/" } else { trimmed };
    std::iter::once(full).chain(
        full.char_indices()
            .rev()
            .filter(|&(i, c)| c == '/' && i > 0)
            .map(move |(i, _)| &full[..i]),
    )
}

/// Segment-aware prefix match.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path == prefix
        || (path.starts_with(prefix) && path.as_bytes().get(prefix.len()) == Some(&b'/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled() -> CompiledManifest {
        RouteManifest::default().compile()
    }

    #[test]
    fn test_classify_protected() {
        let manifest = compiled();
        assert_eq!(manifest.classify("/dashboard"), RouteClass::Protected);
        assert_eq!(
            manifest.classify("/dashboard/settings"),
            RouteClass::Protected
        );
        assert_eq!(manifest.classify("/admin/users"), RouteClass::Protected);
    }

    #[test]
    fn test_classify_auth() {
        let manifest = compiled();
        assert_eq!(manifest.classify("/login"), RouteClass::Auth);
        assert_eq!(manifest.classify("/register"), RouteClass::Auth);
    }

    #[test]
    fn test_classify_public_and_unmatched() {
        let manifest = compiled();
        assert_eq!(manifest.classify("/pricing"), RouteClass::Public);
        assert_eq!(manifest.classify("/"), RouteClass::Public);
        assert_eq!(manifest.classify("/blog/post-1"), RouteClass::Public);
    }

    #[test]
    fn test_classify_is_segment_aware() {
        let manifest = compiled();
        // /dev is protected but /developers is not a match for it.
        assert_eq!(manifest.classify("/developers"), RouteClass::Public);
        assert_eq!(manifest.classify("/dev"), RouteClass::Protected);
        assert_eq!(manifest.classify("/dev/console"), RouteClass::Protected);
    }

    #[test]
    fn test_longest_prefix_wins() {
        let manifest = RouteManifest {
            public: vec!["/docs".to_string()],
            auth: vec![],
            protected: vec!["/docs/internal".to_string()],
            role_gates: vec![],
        }
        .compile();

        assert_eq!(manifest.classify("/docs/guide"), RouteClass::Public);
        assert_eq!(
            manifest.classify("/docs/internal/runbook"),
            RouteClass::Protected
        );
    }

    #[test]
    fn test_role_gate_lookup() {
        let manifest = compiled();
        let gate = manifest.role_gate("/admin/users").expect("gate exists");
        assert_eq!(gate.allowed, vec![PlatformRole::Admin]);
        assert!(manifest.role_gate("/dashboard").is_none());
    }

    #[test]
    fn test_role_gate_most_specific_wins() {
        let manifest = RouteManifest {
            public: vec![],
            auth: vec![],
            protected: vec!["/admin".to_string()],
            role_gates: vec![
                RoleGate {
                    prefix: "/admin".to_string(),
                    allowed: vec![PlatformRole::Admin],
                },
                RoleGate {
                    prefix: "/admin/flags".to_string(),
                    allowed: vec![PlatformRole::Developer],
                },
            ],
        }
        .compile();

        let gate = manifest.role_gate("/admin/flags/rollout").expect("gate");
        assert_eq!(gate.allowed, vec![PlatformRole::Developer]);
    }

    #[test]
    fn test_normalize_prefix_variants() {
        let manifest = RouteManifest {
            public: vec!["pricing/".to_string()],
            auth: vec![],
            protected: vec![],
            role_gates: vec![],
        }
        .compile();
        assert_eq!(manifest.classify("/pricing"), RouteClass::Public);
        assert_eq!(manifest.classify("/pricing/teams"), RouteClass::Public);
    }
}
