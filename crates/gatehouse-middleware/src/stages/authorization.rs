//! Authorization gate stage.
//!
//! The last stage in the chain: decides, per request, between letting
//! the page render, bouncing to login, bouncing away from auth-only
//! pages, routing through onboarding, and attaching a workspace. All
//! decisions key off the locale-stripped path's manifest class and a
//! fresh session snapshot; redirect targets are always same-origin
//! relative paths.
//!
//! Failure policy follows the rest of the pipeline: an identity error
//! downgrades to "no session", a workspace-registry error on an
//! ordinary protected path fails open. Neither ever produces an error
//! page from this stage.

use crate::Handler;
use cookie::{Cookie, SameSite};
use gatehouse_config::{CompiledManifest, GatehouseConfig, RouteClass};
use gatehouse_core::{
    split_locale_prefix, BoxFuture, Directive, EdgeRequest, EdgeResponse, IdentityProvider, Locale,
    Outcome, SessionSnapshot, WorkspaceRegistry, ACTIVE_WORKSPACE_COOKIE, LOCALE_HEADER,
};
use std::sync::Arc;

/// Session-aware routing and access control.
pub struct AuthorizationGateStage {
    manifest: CompiledManifest,
    login_path: String,
    landing_path: String,
    onboarding_path: String,
    default_locale: Locale,
    dev_bypass: bool,
    identity: Arc<dyn IdentityProvider>,
    workspaces: Arc<dyn WorkspaceRegistry>,
}

impl AuthorizationGateStage {
    /// Builds the stage from configuration and its two directories.
    #[must_use]
    pub fn new(
        config: &GatehouseConfig,
        identity: Arc<dyn IdentityProvider>,
        workspaces: Arc<dyn WorkspaceRegistry>,
    ) -> Self {
        Self {
            manifest: config.routes.manifest.compile(),
            login_path: config.routes.login_path.clone(),
            landing_path: config.routes.landing_path.clone(),
            onboarding_path: config.routes.onboarding_path.clone(),
            default_locale: config.locales.default,
            dev_bypass: config.auth.dev_bypass,
            identity,
            workspaces,
        }
    }

    /// Prefixes a well-known path with the resolved locale.
    fn localized(locale: Locale, path: &str) -> String {
        format!("/{}{path}", locale.as_str())
    }

    fn redirect(mut response: EdgeResponse, location: String) -> Outcome {
        response.set_directive(Directive::Redirect {
            location,
            status: http::StatusCode::TEMPORARY_REDIRECT,
        });
        Outcome::Terminal(response)
    }

    /// Builds the login redirect, carrying the original URL in `next`
    /// when it is safe to round-trip.
    fn login_redirect(&self, locale: Locale, request: &EdgeRequest) -> String {
        let mut location = Self::localized(locale, &self.login_path);
        let original = request.path_and_query();
        if is_safe_relative(&original) {
            location.push_str("?next=");
            location.push_str(&urlencoding::encode(&original));
        } else {
            tracing::warn!(
                target: "gatehouse::security",
                original = %original,
                "refusing to round-trip unsafe return URL"
            );
        }
        location
    }

    /// Returns the validated `next` target from the query, if any.
    fn safe_next(request: &EdgeRequest) -> Option<String> {
        request
            .query_param("next")
            .filter(|next| is_safe_relative(next))
    }

    async fn handle_authenticated(
        &self,
        request: &EdgeRequest,
        mut response: EdgeResponse,
        session: SessionSnapshot,
        locale: Locale,
        stripped: &str,
        class: RouteClass,
    ) -> Outcome {
        let landing = Self::localized(locale, &self.landing_path);

        // Logged-in visitors have no business on auth pages or the bare
        // root; send them where they were headed, or to the landing page.
        if class == RouteClass::Auth || stripped == "/" {
            let destination = Self::safe_next(request).unwrap_or(landing);
            return Self::redirect(response, destination);
        }

        if stripped == self.onboarding_path {
            if session.has_workspace() {
                return Self::redirect(response, landing);
            }
            return match self.workspaces.first_workspace_for(&session.principal_id).await {
                Ok(Some(_)) => Self::redirect(response, landing),
                Ok(None) => Outcome::Continue(response),
                Err(error) => {
                    tracing::warn!(%error, "workspace lookup failed, rendering onboarding");
                    Outcome::Continue(response)
                }
            };
        }

        if let Some(gate) = self.manifest.role_gate(stripped) {
            if !gate.allowed.contains(&session.platform_role) {
                tracing::info!(
                    principal = %session.principal_id,
                    role = session.platform_role.as_str(),
                    prefix = %gate.prefix,
                    "role gate declined, routing to landing"
                );
                return Self::redirect(response, landing);
            }
        }

        if class != RouteClass::Protected {
            return Outcome::Continue(response);
        }

        if session.has_workspace() {
            return Outcome::Continue(response);
        }
        match self.workspaces.first_workspace_for(&session.principal_id).await {
            Ok(Some(workspace)) => {
                response.add_cookie(
                    Cookie::build((ACTIVE_WORKSPACE_COOKIE, workspace.to_string()))
                        .path("/")
                        .http_only(true)
                        .same_site(SameSite::Lax)
                        .build(),
                );
                // Same-URL redirect so the next pass sees the cookie.
                Self::redirect(response, request.path_and_query())
            }
            Ok(None) => Self::redirect(response, Self::localized(locale, &self.onboarding_path)),
            Err(error) => {
                tracing::warn!(%error, "workspace lookup failed, failing open");
                Outcome::Continue(response)
            }
        }
    }
}

impl std::fmt::Debug for AuthorizationGateStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGateStage")
            .field("dev_bypass", &self.dev_bypass)
            .finish_non_exhaustive()
    }
}

impl Handler for AuthorizationGateStage {
    fn name(&self) -> &'static str {
        "authorization_gate"
    }

    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            if self.dev_bypass {
                return Outcome::Continue(response);
            }

            let locale = response
                .header(LOCALE_HEADER)
                .and_then(Locale::from_tag)
                .unwrap_or(self.default_locale);
            let (_, stripped) = split_locale_prefix(request.path());
            let class = self.manifest.classify(&stripped);

            let session = match self.identity.session_snapshot(request).await {
                Ok(session) => session,
                Err(error) => {
                    tracing::error!(%error, "session lookup failed, treating as anonymous");
                    None
                }
            };

            match session {
                Some(session) => {
                    self.handle_authenticated(request, response, session, locale, &stripped, class)
                        .await
                }
                None => {
                    if class == RouteClass::Protected {
                        let location = self.login_redirect(locale, request);
                        Self::redirect(response, location)
                    } else {
                        Outcome::Continue(response)
                    }
                }
            }
        })
    }
}

/// `true` when a return URL is a plain same-origin path: starts with a
/// single `/` and cannot be reinterpreted as protocol-relative.
fn is_safe_relative(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//") && !target.starts_with("/\\")
}
