//! Locale routing decisions for inbound request paths.
//!
//! Effective locale precedence, first match wins:
//!
//! 1. a supported locale as the first path segment (`/fr/...`),
//! 2. the persisted preference cookie,
//! 3. `Accept-Language`, by descending `q` weight,
//! 4. [`Locale::DEFAULT`].
//!
//! Unsupported values at any step are skipped. An unsupported first segment
//! (`/de/...`) is just an ordinary path segment.

use crate::Locale;
use serde::Deserialize;

/// How unprefixed paths are mapped onto locale-prefixed routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingStrategy {
    /// Route internally to the prefixed path; the visible URL is unchanged.
    #[default]
    Rewrite,
    /// Send the client a redirect to the prefixed URL.
    Redirect,
}

/// Path prefixes that bypass locale routing by default.
pub const DEFAULT_EXCLUDED_PREFIXES: [&str; 3] = ["/api", "/static", "/health"];

/// Locale hints carried by a request besides its path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocaleHints {
    /// Value of the persisted preference cookie.
    pub cookie: Option<String>,
    /// Raw `Accept-Language` header value.
    pub accept_language: Option<String>,
}

/// What to do with a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Not a page request; leave it alone.
    PassThrough,
    /// The path already carries a supported locale.
    Localized { locale: Locale },
    /// Route internally to `path` (query included).
    Rewrite { locale: Locale, path: String },
    /// Redirect the client to `location` (query included).
    Redirect { locale: Locale, location: String },
}

impl RouteDecision {
    /// The effective locale, if the request is a page request.
    pub fn locale(&self) -> Option<Locale> {
        match self {
            RouteDecision::PassThrough => None,
            RouteDecision::Localized { locale }
            | RouteDecision::Rewrite { locale, .. }
            | RouteDecision::Redirect { locale, .. } => Some(*locale),
        }
    }
}

/// Splits a leading supported locale segment off a path.
///
/// `/fr/privacy-policy` gives `(Fr, "/privacy-policy")`, `/fr` and `/fr/`
/// give `(Fr, "/")`.
pub fn split_locale_prefix(path: &str) -> Option<(Locale, &str)> {
    let trimmed = path.strip_prefix('/')?;
    let (segment, rest) = match trimmed.find('/') {
        Some(index) => trimmed.split_at(index),
        None => (trimmed, ""),
    };
    let locale = Locale::from_segment(segment)?;
    let rest = if rest.is_empty() { "/" } else { rest };
    Some((locale, rest))
}

/// Drops trailing slashes so `/fr/` and `/privacy-policy/` reach the same
/// routes as `/fr` and `/privacy-policy`. The root path stays `/`.
pub fn trim_trailing_slash(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Returns true for paths locale routing must not touch: the given
/// prefixes (matched on segment boundaries) and any path whose last segment
/// has a file extension.
pub fn is_excluded<S: AsRef<str>>(path: &str, excluded_prefixes: &[S]) -> bool {
    let under_prefix = excluded_prefixes.iter().any(|prefix| {
        let prefix = prefix.as_ref().trim_end_matches('/');
        path == prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    });
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    under_prefix || last_segment.contains('.')
}

/// Picks the locale for a request without a locale prefix.
pub fn negotiate(hints: &LocaleHints) -> Locale {
    if let Some(locale) = hints.cookie.as_deref().and_then(Locale::from_code) {
        return locale;
    }
    hints
        .accept_language
        .as_deref()
        .and_then(from_accept_language)
        .unwrap_or(Locale::DEFAULT)
}

/// Picks the best supported locale from an `Accept-Language` header.
///
/// Entries are tried by descending `q` (ties keep header order), each as an
/// exact code and then by primary subtag. `q=0` entries, entries with an
/// unparsable weight and `*` are ignored.
pub fn from_accept_language(header: &str) -> Option<Locale> {
    let mut entries: Vec<(&str, f32)> = header
        .split(',')
        .filter_map(|raw| {
            let mut parts = raw.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let weight = parts
                .find_map(|param| param.trim().strip_prefix("q="))
                .map_or(Some(1.0), |q| q.trim().parse::<f32>().ok())
                .unwrap_or(0.0);
            (weight > 0.0).then_some((tag, weight))
        })
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.into_iter().find_map(|(tag, _)| Locale::from_code(tag))
}

/// Decides how to route a request path.
///
/// `query` is the raw query string without `?`, carried onto rewrite and
/// redirect targets.
pub fn decide<S: AsRef<str>>(
    path: &str,
    query: Option<&str>,
    hints: &LocaleHints,
    strategy: RoutingStrategy,
    excluded_prefixes: &[S],
) -> RouteDecision {
    if is_excluded(path, excluded_prefixes) {
        return RouteDecision::PassThrough;
    }
    if let Some((locale, _)) = split_locale_prefix(path) {
        return RouteDecision::Localized { locale };
    }
    let locale = negotiate(hints);
    let target = localized_path(locale, path, query);
    match strategy {
        RoutingStrategy::Rewrite => RouteDecision::Rewrite {
            locale,
            path: target,
        },
        RoutingStrategy::Redirect => RouteDecision::Redirect {
            locale,
            location: target,
        },
    }
}

/// Prefixes a path with a locale: `/` becomes `/{code}`, anything else
/// `/{code}{path}`.
pub fn localized_path(locale: Locale, path: &str, query: Option<&str>) -> String {
    let mut target = format!("/{}", locale.code());
    if !path.is_empty() && path != "/" {
        if !path.starts_with('/') {
            target.push('/');
        }
        target.push_str(path);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        target.push('?');
        target.push_str(query);
    }
    target
}
