//! Response accumulator and handler outcome.
//!
//! [`EdgeResponse`] is the mutable accumulator threaded through the
//! pipeline: outbound headers, outbound cookies, and at most one terminal
//! [`Directive`]. [`Outcome`] is the tagged result every stage returns,
//! replacing null-checks with an explicit `Continue`/`Terminal` split.

use bytes::Bytes;
use cookie::Cookie;
use http::{HeaderMap, StatusCode};
use http_body_util::Full;

/// The terminal directive carried by a response-in-progress.
///
/// `Passthrough` means "no opinion so far": the hosting runtime serves
/// the request through its normal routing. `Rewrite` swaps the internal
/// path without telling the client. `Redirect` sends the client
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Continue to the application's normal routing.
    Passthrough,
    /// Internally rewrite the request to a different path.
    Rewrite {
        /// The internal path to serve instead.
        path: String,
    },
    /// Redirect the client.
    Redirect {
        /// The redirect target. Always a same-origin relative path except
        /// for the canonical-host redirect, which stays on the platform's
        /// own apex domain.
        location: String,
        /// The redirect status code (301, 307, or 308).
        status: StatusCode,
    },
}

/// The response being accumulated as the pipeline runs.
///
/// State propagates between stages exclusively through this accumulator:
/// the resolved-locale marker header, outbound cookies, and the terminal
/// directive. Stages never share in-process mutable state.
///
/// # Example
///
/// ```
/// use gatehouse_core::{Directive, EdgeResponse};
///
/// let mut response = EdgeResponse::new();
/// response.set_header("x-app-locale", "en-US");
/// assert_eq!(response.header("x-app-locale"), Some("en-US"));
/// assert_eq!(*response.directive(), Directive::Passthrough);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EdgeResponse {
    headers: HeaderMap,
    cookies: Vec<Cookie<'static>>,
    directive: Directive,
}

impl Default for Directive {
    fn default() -> Self {
        Self::Passthrough
    }
}

impl EdgeResponse {
    /// Creates an empty passthrough response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a response with a redirect directive.
    #[must_use]
    pub fn redirect(location: impl Into<String>, status: StatusCode) -> Self {
        Self {
            directive: Directive::Redirect {
                location: location.into(),
                status,
            },
            ..Self::default()
        }
    }

    /// Creates a response with a rewrite directive.
    #[must_use]
    pub fn rewrite(path: impl Into<String>) -> Self {
        Self {
            directive: Directive::Rewrite { path: path.into() },
            ..Self::default()
        }
    }

    /// Sets an outbound header, replacing any previous value.
    ///
    /// Invalid names or values are dropped with a warning rather than
    /// failing the request.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => {
                tracing::warn!(header = name, "dropping invalid outbound header");
            }
        }
    }

    /// Returns an outbound header value, if set and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns all outbound headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Adds an outbound `Set-Cookie`.
    pub fn add_cookie(&mut self, cookie: Cookie<'static>) {
        self.cookies.push(cookie);
    }

    /// Returns the outbound cookies accumulated so far.
    #[must_use]
    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.cookies
    }

    /// Returns an outbound cookie by name, if one has been added.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&Cookie<'static>> {
        self.cookies.iter().find(|c| c.name() == name)
    }

    /// Returns the current directive.
    #[must_use]
    pub fn directive(&self) -> &Directive {
        &self.directive
    }

    /// Replaces the directive, preserving accumulated headers and cookies.
    pub fn set_directive(&mut self, directive: Directive) {
        self.directive = directive;
    }

    /// Converts the accumulator into an `http::Response` for the hosting
    /// runtime.
    ///
    /// Redirects become a `Location` header plus status; rewrites are
    /// expressed through the `x-gatehouse-rewrite` header with a 200
    /// status, which the hosting runtime maps onto its internal routing;
    /// passthrough is a bare 200. Accumulated headers and `Set-Cookie`
    /// values are attached in every case.
    #[must_use]
    pub fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut builder = http::Response::builder();

        match &self.directive {
            Directive::Passthrough => {
                builder = builder.status(StatusCode::OK);
            }
            Directive::Rewrite { path } => {
                builder = builder.status(StatusCode::OK).header("x-gatehouse-rewrite", path);
            }
            Directive::Redirect { location, status } => {
                builder = builder.status(*status).header(http::header::LOCATION, location);
            }
        }

        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        for cookie in &self.cookies {
            builder = builder.header(http::header::SET_COOKIE, cookie.to_string());
        }

        builder
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|_| http::Response::new(Full::new(Bytes::new())))
    }
}

/// Tagged result of a pipeline stage.
///
/// `Continue` threads the accumulator to the next stage; `Terminal`
/// stops the chain immediately. Once a stage returns `Terminal`, no
/// later stage runs, so no later stage can override the directive.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Pass the accumulator to the next stage.
    Continue(EdgeResponse),
    /// Stop the chain and return this response.
    Terminal(EdgeResponse),
}

impl Outcome {
    /// Returns `true` if this outcome stops the chain.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Unwraps the response regardless of the tag.
    #[must_use]
    pub fn into_response(self) -> EdgeResponse {
        match self {
            Self::Continue(response) | Self::Terminal(response) => response,
        }
    }

    /// Borrows the response regardless of the tag.
    #[must_use]
    pub fn response(&self) -> &EdgeResponse {
        match self {
            Self::Continue(response) | Self::Terminal(response) => response,
        }
    }
}
