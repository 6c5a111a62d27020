//! Locale tags and negotiation.
//!
//! The platform supports a fixed, closed set of locale tags plus one
//! default. The locale stage resolves the active locale exactly once per
//! request and stamps it into the `x-app-locale` marker header; nothing
//! else in the pipeline re-negotiates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported locale tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    /// English (United States) — the platform default.
    #[serde(rename = "en-US")]
    EnUs,
    /// Spanish (Spain).
    #[serde(rename = "es-ES")]
    EsEs,
    /// Portuguese (Brazil).
    #[serde(rename = "pt-BR")]
    PtBr,
}

impl Locale {
    /// All supported locales, default first.
    pub const ALL: [Self; 3] = [Self::EnUs, Self::EsEs, Self::PtBr];

    /// Returns the canonical tag for this locale.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::EsEs => "es-ES",
            Self::PtBr => "pt-BR",
        }
    }

    /// Returns the base language subtag (`en` for `en-US`).
    #[must_use]
    pub const fn language(self) -> &'static str {
        match self {
            Self::EnUs => "en",
            Self::EsEs => "es",
            Self::PtBr => "pt",
        }
    }

    /// Parses a tag case-insensitively; accepts both the full tag and the
    /// bare language subtag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL.iter().copied().find(|locale| {
            tag.eq_ignore_ascii_case(locale.as_str()) || tag.eq_ignore_ascii_case(locale.language())
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

/// Error returned when parsing an unsupported locale tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale tag: {0}")]
pub struct UnknownLocale(pub String);

/// Splits a leading locale segment off a path.
///
/// Returns the locale (if the first segment is a supported tag) and the
/// remainder of the path. The remainder always starts with `/`; the bare
/// prefix `/en-US` yields `/`.
///
/// # Example
///
/// ```
/// use gatehouse_core::{split_locale_prefix, Locale};
///
/// assert_eq!(
///     split_locale_prefix("/en-US/dashboard"),
///     (Some(Locale::EnUs), "/dashboard".to_string())
/// );
/// assert_eq!(split_locale_prefix("/pricing"), (None, "/pricing".to_string()));
/// ```
#[must_use]
pub fn split_locale_prefix(path: &str) -> (Option<Locale>, String) {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));

    // The locale segment must match a full tag exactly; a bare language
    // segment like /en would shadow real routes.
    let locale = Locale::ALL
        .iter()
        .copied()
        .find(|locale| first.eq_ignore_ascii_case(locale.as_str()));

    match locale {
        Some(locale) => {
            let remainder = if rest.is_empty() {
                "/".to_string()
            } else {
                format!("/{rest}")
            };
            (Some(locale), remainder)
        }
        None => (None, path.to_string()),
    }
}

/// Negotiates a locale from an `Accept-Language` header value.
///
/// Entries are ordered by their `q` weight; each is matched against the
/// supported set first by full tag, then by base language. Falls back to
/// `default` when nothing matches or the header is absent.
#[must_use]
pub fn negotiate(accept_language: Option<&str>, supported: &[Locale], default: Locale) -> Locale {
    let Some(header) = accept_language else {
        return default;
    };

    let mut candidates: Vec<(f32, &str)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = parts
                .find_map(|p| p.trim().strip_prefix("q=").and_then(|q| q.parse::<f32>().ok()))
                .unwrap_or(1.0);
            Some((quality, tag))
        })
        .collect();

    // Stable sort keeps header order for equal weights.
    candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    for (_, tag) in &candidates {
        if let Some(exact) = supported
            .iter()
            .copied()
            .find(|locale| tag.eq_ignore_ascii_case(locale.as_str()))
        {
            return exact;
        }
        let base = tag.split('-').next().unwrap_or(tag);
        if let Some(by_language) = supported
            .iter()
            .copied()
            .find(|locale| base.eq_ignore_ascii_case(locale.language()))
        {
            return by_language;
        }
    }

    default
}
