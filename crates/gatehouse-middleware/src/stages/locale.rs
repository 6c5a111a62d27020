//! Locale resolution stage.
//!
//! Resolves the active locale exactly once per request and stamps it
//! into the `x-app-locale` marker header for every later stage.
//! Resolution order: explicit path prefix, then the preference cookie,
//! then `Accept-Language` negotiation, then the platform default.
//!
//! The default locale lives at unprefixed paths; any other locale is
//! surfaced in the URL, so an unprefixed request resolving to a
//! non-default locale gets a permanent-method-preserving 308 onto the
//! prefixed form.

use crate::Handler;
use gatehouse_config::GatehouseConfig;
use gatehouse_core::{
    negotiate, split_locale_prefix, BoxFuture, Directive, EdgeRequest, EdgeResponse, Locale,
    Outcome, LOCALE_HEADER,
};

/// Stamps the resolved locale and enforces the prefix convention.
#[derive(Debug, Clone)]
pub struct LocaleStage {
    supported: Vec<Locale>,
    default: Locale,
    preference_cookie: String,
}

impl LocaleStage {
    /// Builds the stage from configuration.
    #[must_use]
    pub fn new(config: &GatehouseConfig) -> Self {
        Self {
            supported: config.locales.supported.clone(),
            default: config.locales.default,
            preference_cookie: config.locales.preference_cookie.clone(),
        }
    }

    fn cookie_preference(&self, request: &EdgeRequest) -> Option<Locale> {
        request
            .cookie(&self.preference_cookie)
            .and_then(Locale::from_tag)
            .filter(|locale| self.supported.contains(locale))
    }
}

impl Handler for LocaleStage {
    fn name(&self) -> &'static str {
        "locale"
    }

    fn handle<'a>(
        &'a self,
        request: &'a EdgeRequest,
        mut response: EdgeResponse,
    ) -> BoxFuture<'a, Outcome> {
        Box::pin(async move {
            let (prefixed, _) = split_locale_prefix(request.path());
            if let Some(locale) = prefixed.filter(|l| self.supported.contains(l)) {
                response.set_header(LOCALE_HEADER, locale.as_str());
                return Outcome::Continue(response);
            }

            let resolved = self.cookie_preference(request).unwrap_or_else(|| {
                negotiate(
                    request.header("accept-language"),
                    &self.supported,
                    self.default,
                )
            });
            response.set_header(LOCALE_HEADER, resolved.as_str());

            if resolved == self.default {
                return Outcome::Continue(response);
            }

            // Non-default locales are visible in the URL.
            let location = format!("/{}{}", resolved.as_str(), request.path_and_query());
            tracing::debug!(locale = %resolved, %location, "adding locale prefix");
            response.set_directive(Directive::Redirect {
                location,
                status: http::StatusCode::PERMANENT_REDIRECT,
            });
            Outcome::Terminal(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> LocaleStage {
        LocaleStage::new(&GatehouseConfig::default())
    }

    #[tokio::test]
    async fn test_prefixed_path_stamps_marker() {
        let request = EdgeRequest::builder().path("/es-ES/pricing").build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.response().header(LOCALE_HEADER), Some("es-ES"));
    }

    #[tokio::test]
    async fn test_default_locale_needs_no_prefix() {
        let request = EdgeRequest::builder()
            .path("/pricing")
            .header("accept-language", "en-US,en;q=0.9")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.response().header(LOCALE_HEADER), Some("en-US"));
    }

    #[tokio::test]
    async fn test_negotiated_non_default_redirects_with_308() {
        let request = EdgeRequest::builder()
            .path("/pricing")
            .query("ref=launch")
            .header("accept-language", "pt-BR,pt;q=0.9,en;q=0.5")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(outcome.is_terminal());
        assert_eq!(
            outcome.response().directive(),
            &Directive::Redirect {
                location: "/pt-BR/pricing?ref=launch".to_string(),
                status: http::StatusCode::PERMANENT_REDIRECT,
            }
        );
    }

    #[tokio::test]
    async fn test_preference_cookie_beats_accept_language() {
        let request = EdgeRequest::builder()
            .path("/pricing")
            .cookie("preferred_locale", "es-ES")
            .header("accept-language", "pt-BR")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(outcome.is_terminal());
        assert_eq!(outcome.response().header(LOCALE_HEADER), Some("es-ES"));
    }

    #[tokio::test]
    async fn test_missing_header_falls_back_to_default() {
        let request = EdgeRequest::builder().path("/pricing").build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.response().header(LOCALE_HEADER), Some("en-US"));
    }

    #[tokio::test]
    async fn test_unsupported_cookie_value_ignored() {
        let request = EdgeRequest::builder()
            .path("/pricing")
            .cookie("preferred_locale", "fr-FR")
            .build();
        let outcome = stage().handle(&request, EdgeResponse::new()).await;
        assert!(!outcome.is_terminal());
        assert_eq!(outcome.response().header(LOCALE_HEADER), Some("en-US"));
    }
}
