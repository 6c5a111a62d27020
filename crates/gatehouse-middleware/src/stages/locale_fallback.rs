//! First-visit locale fallback stage.
//!
//! Runs only when the request carries no locale preference cookie (the
//! orchestrator gates it). It persists the locale the locale stage
//! resolved, so later visits skip this stage entirely, and it repairs
//! the one residual case where a first-time visitor on an unprefixed
//! path resolved to a non-default locale: a one-time 307 onto the
//! prefixed form, cookie attached, so the loop cannot recur.
//!
//! In the assembled chain the locale stage 308-terminates unprefixed
//! non-default requests before this stage runs, so the 307 branch is
//! a backstop: it keeps the stage correct when run standalone or if
//! the chain order ever changes.

use crate::Handler;
use cookie::{Cookie, SameSite};
use gatehouse_config::GatehouseConfig;
use gatehouse_core::{
    split_locale_prefix, BoxFuture, Directive, EdgeRequest, EdgeResponse, Locale, Outcome,
    LOCALE_HEADER,
};

const PREFERENCE_COOKIE_DAYS: i64 = 365;

/// Persists the resolved locale for first-time visitors.
#[derive(Debug, Clone)]
pub struct LocaleFallbackStage {
    default: Locale,
    preference_cookie: String,
}

impl LocaleFallbackStage {
    /// Builds the stage from configuration.
    #[must_use]
    pub fn new(config: &GatehouseConfig) -> Self {
        Self {
            default: config.locales.default,
            preference_cookie: config.locales.preference_cookie.clone(),
        }
    }

    fn preference_cookie(&self, locale: Locale) -> Cookie<'static> {
        Cookie::build((self.preference_cookie.clone(), locale.as_str()))
            .path("/")
            .same_site(SameSite::Lax)
            .max_age(cookie::time::Duration::days(PREFERENCE_COOKIE_DAYS))
            .build()
    }
}

impl Handler for LocaleFallbackStage {
    fn name(&self) -> &'static str {
        "locale_fallback"
    }

    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        mut response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let resolved = response
                .header(LOCALE_HEADER)
                .and_then(Locale::from_tag)
                .unwrap_or(self.default);

            response.add_cookie(self.preference_cookie(resolved));

            let (prefixed, _) = split_locale_prefix(request.path());
            if prefixed.is_some() || resolved == self.default {
                return Outcome::Continue(response);
            }

            let location = format!("/{}{}", resolved.as_str(), request.path_and_query());
            tracing::debug!(locale = %resolved, %location, "first-visit locale redirect");
            response.set_directive(Directive::Redirect {
                location,
                status: http::StatusCode::TEMPORARY_REDIRECT,
            });
            Outcome::Terminal(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> LocaleFallbackStage {
        LocaleFallbackStage::new(&GatehouseConfig::default())
    }

    #[tokio::test]
    async fn test_stamps_preference_cookie() {
        let request = EdgeRequest::builder().path("/es-ES/pricing").build();
        let mut response = EdgeResponse::new();
        response.set_header(LOCALE_HEADER, "es-ES");

        let outcome = stage().handle(&request, response).await;
        assert!(!outcome.is_terminal());
        let cookie = outcome
            .response()
            .cookie("preferred_locale")
            .expect("cookie set");
        assert_eq!(cookie.value(), "es-ES");
        assert_eq!(cookie.path(), Some("/"));
    }

    #[tokio::test]
    async fn test_default_locale_on_unprefixed_path_continues() {
        let request = EdgeRequest::builder().path("/pricing").build();
        let mut response = EdgeResponse::new();
        response.set_header(LOCALE_HEADER, "en-US");

        let outcome = stage().handle(&request, response).await;
        assert!(!outcome.is_terminal());
        assert_eq!(
            outcome
                .response()
                .cookie("preferred_locale")
                .map(Cookie::value),
            Some("en-US")
        );
    }

    #[tokio::test]
    async fn test_non_default_unprefixed_path_redirects_once() {
        let request = EdgeRequest::builder().path("/pricing").build();
        let mut response = EdgeResponse::new();
        response.set_header(LOCALE_HEADER, "pt-BR");

        let outcome = stage().handle(&request, response).await;
        assert!(outcome.is_terminal());
        assert_eq!(
            outcome.response().directive(),
            &Directive::Redirect {
                location: "/pt-BR/pricing".to_string(),
                status: http::StatusCode::TEMPORARY_REDIRECT,
            }
        );
        // The cookie rides along with the redirect.
        assert!(outcome.response().cookie("preferred_locale").is_some());
    }

    #[tokio::test]
    async fn test_missing_marker_falls_back_to_default() {
        let request = EdgeRequest::builder().path("/pricing").build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
        assert_eq!(
            outcome
                .response()
                .cookie("preferred_locale")
                .map(Cookie::value),
            Some("en-US")
        );
    }
}
