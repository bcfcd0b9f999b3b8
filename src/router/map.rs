use indexmap::IndexMap;
use tracing::{debug, info};

use super::pattern::{path_patterns, PathPattern};
use crate::config::{MatchConfig, ServerMatch};
use crate::error::Result;
use crate::spec::Document;

/// Path templates mapped to their compiled matchers, in declaration order.
///
/// A `PatternMap` is an immutable value derived from one [`Document`]. It holds
/// no global state. Callers that match many URLs against the same document
/// should build it once and keep it.
///
/// Paths with no applicable server compile to no matcher and are left out.
#[derive(Debug, Clone, Default)]
pub struct PatternMap {
    entries: IndexMap<String, Vec<PathPattern>>,
    config: MatchConfig,
}

impl PatternMap {
    /// Build with [`MatchConfig::default`].
    ///
    /// # Errors
    ///
    /// See [`PatternMap::build_with`].
    pub fn build(document: &Document) -> Result<Self> {
        Self::build_with(document, MatchConfig::default())
    }

    /// Compile every declared path of `document`.
    ///
    /// A document without `paths`, or with an empty `paths` object, yields an
    /// empty map.
    ///
    /// # Errors
    ///
    /// Any server expansion or pattern compilation error for any path. The
    /// first failure aborts the build.
    pub fn build_with(document: &Document, config: MatchConfig) -> Result<Self> {
        let mut entries = IndexMap::new();
        let Some(paths) = document.paths.as_ref().filter(|p| !p.is_empty()) else {
            debug!("Document declares no paths; pattern map is empty");
            return Ok(Self { entries, config });
        };

        for path in paths.keys() {
            let mut patterns = path_patterns(document, path, &config)?;
            if config.server_match == ServerMatch::LastServer {
                patterns = patterns.pop().into_iter().collect();
            }
            if patterns.is_empty() {
                debug!(path = %path, "No server applies to path; skipping");
                continue;
            }
            entries.insert(path.clone(), patterns);
        }

        info!(
            paths_count = entries.len(),
            patterns_count = entries.values().map(Vec::len).sum::<usize>(),
            server_match = ?config.server_match,
            escape_server_urls = config.escape_server_urls,
            "Pattern map built"
        );

        Ok(Self { entries, config })
    }

    /// Number of path templates with at least one matcher.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Path templates in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Compiled matchers for `path`, in server order.
    #[must_use]
    pub fn patterns(&self, path: &str) -> Option<&[PathPattern]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// `(path, matchers)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathPattern])> {
        self.entries
            .iter()
            .map(|(path, patterns)| (path.as_str(), patterns.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_paths() {
        assert!(PatternMap::build(&Document::default()).unwrap().is_empty());
        assert!(PatternMap::build(&doc(json!({ "paths": {} })))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_declaration_order_kept() {
        let d = doc(json!({
            "servers": [{ "url": "https://example.com" }],
            "paths": { "/zebra": {}, "/apple": {}, "/mango/{id}": {} }
        }));
        let map = PatternMap::build(&d).unwrap();
        assert_eq!(map.paths().collect::<Vec<_>>(), vec!["/zebra", "/apple", "/mango/{id}"]);
    }

    #[test]
    fn test_any_server_keeps_every_pattern() {
        let d = doc(json!({
            "servers": [{ "url": "https://a.example.com" }],
            "paths": { "/pets": { "servers": [{ "url": "https://b.example.com" }] } }
        }));
        let map = PatternMap::build(&d).unwrap();
        let patterns = map.patterns("/pets").unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].base_url(), "https://a.example.com");
        assert_eq!(patterns[1].base_url(), "https://b.example.com");
    }

    #[test]
    fn test_last_server_keeps_last_pattern() {
        let d = doc(json!({
            "servers": [{ "url": "https://a.example.com" }],
            "paths": { "/pets": { "servers": [{ "url": "https://b.example.com" }] } }
        }));
        let cfg = MatchConfig {
            server_match: ServerMatch::LastServer,
            ..MatchConfig::default()
        };
        let map = PatternMap::build_with(&d, cfg).unwrap();
        let patterns = map.patterns("/pets").unwrap();
        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].base_url(), "https://b.example.com");
    }

    #[test]
    fn test_paths_without_servers_are_skipped() {
        let d = doc(json!({ "paths": { "/orphan": {} } }));
        let map = PatternMap::build(&d).unwrap();
        assert!(map.is_empty());
        assert!(map.patterns("/orphan").is_none());
    }

    #[test]
    fn test_server_errors_abort_build() {
        let d = doc(json!({
            "servers": [{ "url": "https://{env}.example.com", "variables": { "env": { "enum": ["a"] } } }],
            "paths": { "/pets": {} }
        }));
        assert!(matches!(
            PatternMap::build(&d),
            Err(crate::MatchError::MissingDefault { .. })
        ));
    }
}
