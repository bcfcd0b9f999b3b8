//! URL matcher: the top-level entry points.
//!
//! Matching is a linear scan over the [`PatternMap`] in path declaration order.
//! The first path with any matcher accepting the normalized URL wins. No
//! specificity ranking is applied, and the HTTP method is not considered.

use std::time::Instant;

use serde_json::Value;
use tracing::debug;
use url::Url;

use super::map::PatternMap;
use super::pattern::ParamVec;
use crate::config::MatchConfig;
use crate::error::{MatchError, Result};
use crate::spec::{is_falsy, Document};

/// Result of resolving a URL to a declared path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch<'a> {
    /// The path template as declared, e.g. `/users/{id}`.
    pub path: &'a str,
    /// The concrete base URL whose matcher accepted the URL.
    pub base_url: &'a str,
    /// Path parameters captured from the URL, in template order.
    pub params: ParamVec,
}

impl PathMatch<'_> {
    /// Get a captured path parameter by name.
    ///
    /// Duplicate names resolve to the last occurrence.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Validate a URL and strip its query string and fragment.
///
/// The URL is re-serialized by the `url` crate, so the result is the WHATWG
/// normal form (lowercased scheme and host, `/` path for a bare origin).
///
/// # Errors
///
/// - [`MatchError::MissingUrl`] for an empty string
/// - [`MatchError::InvalidUrl`] if the string is not an absolute URL
pub fn normalize_url(url: &str) -> Result<String> {
    if url.is_empty() {
        return Err(MatchError::MissingUrl);
    }
    let mut parsed = Url::parse(url).map_err(|source| MatchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    parsed.set_query(None);
    parsed.set_fragment(None);
    Ok(parsed.into())
}

impl PatternMap {
    /// Resolve `url` to the first matching path template.
    ///
    /// # Errors
    ///
    /// See [`normalize_url`]. Not matching any path is `Ok(None)`.
    pub fn find(&self, url: &str) -> Result<Option<PathMatch<'_>>> {
        let normalized = normalize_url(url)?;
        Ok(self.find_normalized(&normalized))
    }

    /// Like [`PatternMap::find`] for a URL already passed through [`normalize_url`].
    #[must_use]
    pub fn find_normalized(&self, url: &str) -> Option<PathMatch<'_>> {
        let match_start = Instant::now();

        for (path, patterns) in self.iter() {
            for pattern in patterns {
                if let Some(params) = pattern.captures(url) {
                    debug!(
                        url = %url,
                        path = %path,
                        base_url = %pattern.base_url(),
                        path_params = ?params,
                        duration_us = match_start.elapsed().as_micros(),
                        "Path matched"
                    );
                    return Some(PathMatch {
                        path,
                        base_url: pattern.base_url(),
                        params,
                    });
                }
            }
        }

        debug!(
            url = %url,
            paths_count = self.len(),
            duration_us = match_start.elapsed().as_micros(),
            "No path matched"
        );
        None
    }

    /// Whether `url` resolves to any declared path.
    ///
    /// # Errors
    ///
    /// See [`normalize_url`].
    pub fn is_match(&self, url: &str) -> Result<bool> {
        let normalized = normalize_url(url)?;
        Ok(self
            .iter()
            .any(|(_, patterns)| patterns.iter().any(|p| p.is_match(&normalized))))
    }
}

/// Resolve `url` to the path template of `document` it belongs to.
///
/// The pattern map is rebuilt on every call; hold a [`PatternMap`] for
/// repeated lookups against the same document.
///
/// # Errors
///
/// URL validation errors (see [`normalize_url`]) are reported before any
/// pattern is compiled; then any [`PatternMap::build`] error.
///
/// # Example
///
/// ```
/// use brrtpath::{match_url, Document};
///
/// let doc: Document = serde_json::from_value(serde_json::json!({
///     "servers": [{ "url": "https://api.example.com/v1" }],
///     "paths": { "/users/{id}": {} }
/// })).unwrap();
///
/// let path = match_url(&doc, "https://api.example.com/v1/users/42?verbose=1").unwrap();
/// assert_eq!(path.as_deref(), Some("/users/{id}"));
/// ```
pub fn match_url(document: &Document, url: &str) -> Result<Option<String>> {
    match_url_with(document, url, MatchConfig::default())
}

/// [`match_url`] with explicit matcher options.
///
/// # Errors
///
/// See [`match_url`].
pub fn match_url_with(document: &Document, url: &str, config: MatchConfig) -> Result<Option<String>> {
    let normalized = normalize_url(url)?;
    let map = PatternMap::build_with(document, config)?;
    Ok(map
        .find_normalized(&normalized)
        .map(|m| m.path.to_string()))
}

/// [`match_url`] over loosely-typed inputs.
///
/// `null`, `false`, `0` and `""` count as not provided, and that check runs
/// before the type check for each argument.
///
/// # Errors
///
/// - [`MatchError::MissingSpec`] / [`MatchError::SpecNotObject`] for `spec`
/// - [`MatchError::MissingUrl`] / [`MatchError::UrlNotString`] for `url`
/// - [`MatchError::InvalidDocument`] if `spec` does not deserialize
/// - anything [`match_url`] returns
pub fn match_url_value(spec: &Value, url: &Value) -> Result<Option<String>> {
    if is_falsy(spec) {
        return Err(MatchError::MissingSpec);
    }
    if !spec.is_object() {
        return Err(MatchError::SpecNotObject);
    }
    if is_falsy(url) {
        return Err(MatchError::MissingUrl);
    }
    let Value::String(url) = url else {
        return Err(MatchError::UrlNotString);
    };
    // Reject the URL before paying for document conversion.
    let normalized = normalize_url(url)?;

    let document: Document =
        serde_json::from_value(spec.clone()).map_err(MatchError::InvalidDocument)?;
    let map = PatternMap::build(&document)?;
    Ok(map
        .find_normalized(&normalized)
        .map(|m| m.path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_strips_query_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/a/b?x=1#frag").unwrap(),
            "https://example.com/a/b"
        );
        assert_eq!(normalize_url("HTTP://Example.COM").unwrap(), "http://example.com/");
    }

    #[test]
    fn test_normalize_errors() {
        assert!(matches!(normalize_url(""), Err(MatchError::MissingUrl)));
        assert!(matches!(
            normalize_url("dhhdh"),
            Err(MatchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_value_argument_checks() {
        let url = json!("https://example.com");
        for spec in [Value::Null, json!(""), json!(0), json!(false)] {
            assert!(matches!(
                match_url_value(&spec, &url),
                Err(MatchError::MissingSpec)
            ));
        }
        for spec in [json!("openapi.yaml"), json!(1), json!(true), json!([])] {
            assert!(matches!(
                match_url_value(&spec, &url),
                Err(MatchError::SpecNotObject)
            ));
        }
        for missing in [Value::Null, json!(""), json!(0), json!(false)] {
            assert!(matches!(
                match_url_value(&json!({}), &missing),
                Err(MatchError::MissingUrl)
            ));
        }
        for bad in [json!({}), json!(7), json!(true)] {
            assert!(matches!(
                match_url_value(&json!({}), &bad),
                Err(MatchError::UrlNotString)
            ));
        }
        assert!(matches!(
            match_url_value(&json!({}), &json!("dhhdh")),
            Err(MatchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_value_match() {
        let spec = json!({
            "servers": [{ "url": "https://example.com" }],
            "paths": { "/pets/{id}": {} }
        });
        let got = match_url_value(&spec, &json!("https://example.com/pets/1")).unwrap();
        assert_eq!(got.as_deref(), Some("/pets/{id}"));
    }

    #[test]
    fn test_get_param_last_wins() {
        let doc: Document = serde_json::from_value(json!({
            "servers": [{ "url": "https://example.com" }],
            "paths": { "/org/{id}/user/{id}": {} }
        }))
        .unwrap();
        let map = PatternMap::build(&doc).unwrap();
        let m = map.find("https://example.com/org/1/user/2").unwrap().unwrap();
        assert_eq!(m.get_param("id"), Some("2"));
        assert_eq!(m.params.len(), 2);
    }
}
