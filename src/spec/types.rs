use std::fmt;

use indexmap::IndexMap;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Paths Object keys with this prefix are specification extensions, not paths.
pub const EXTENSION_PREFIX: &str = "x-";

/// Ordered values a server variable may take: the default first, then each
/// distinct `enum` entry in declaration order.
pub type VariableValueSet = Vec<String>;

/// One concrete value per server variable name, in variable declaration order.
pub type VariableAssignment = IndexMap<String, String>;

/// The subset of an OpenAPI 3.0.x/3.1.x document the matcher consults.
///
/// Unknown fields (`openapi`, `info`, operations, components, ...) are ignored
/// on deserialization. Paths keep their declaration order, which decides the
/// winner when several templates match the same URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,
    /// Declared paths. `x-` extension entries are dropped while parsing.
    #[serde(
        default,
        deserialize_with = "deserialize_paths",
        skip_serializing_if = "Option::is_none"
    )]
    pub paths: Option<IndexMap<String, PathItem>>,
}

fn deserialize_paths<'de, D>(deserializer: D) -> Result<Option<IndexMap<String, PathItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PathsVisitor;

    impl<'de> Visitor<'de> for PathsVisitor {
        type Value = Option<IndexMap<String, PathItem>>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a paths object")
        }

        fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, deserializer: D2) -> Result<Self::Value, D2::Error> {
            deserializer.deserialize_map(self)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut paths = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(key) = access.next_key::<String>()? {
                if key.starts_with(EXTENSION_PREFIX) {
                    access.next_value::<IgnoredAny>()?;
                    continue;
                }
                let item = access.next_value::<PathItem>()?;
                paths.insert(key, item);
            }
            Ok(Some(paths))
        }
    }

    deserializer.deserialize_option(PathsVisitor)
}

/// A path item. Only its `servers` override is relevant for matching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servers: Option<Vec<Server>>,
}

/// A server declaration: a base URL template plus its substitution variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Server {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<IndexMap<String, ServerVariable>>,
}

impl Server {
    /// Server with a URL and no variables.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Add a variable declaration, keeping insertion order.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, variable: ServerVariable) -> Self {
        self.variables
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), variable);
        self
    }
}

/// A named placeholder in a server URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ServerVariable {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: Some(default.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// A server URL template with every variable expanded to its value set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedUrl {
    pub url: String,
    pub variables: IndexMap<String, VariableValueSet>,
}

/// A server URL template paired with every variable assignment to substitute.
///
/// An empty `variables` list means "use `url` verbatim".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlAssignments {
    pub url: String,
    pub variables: Vec<VariableAssignment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extension_entries_skipped() {
        let doc: Document = serde_json::from_value(json!({
            "paths": {
                "x-internal": true,
                "/users": { "servers": [{ "url": "https://example.com" }] },
                "x-tags": ["a", "b"],
                "/users/{id}": {}
            }
        }))
        .unwrap();
        let paths = doc.paths.unwrap();
        assert_eq!(paths.keys().collect::<Vec<_>>(), vec!["/users", "/users/{id}"]);
        assert!(paths["/users"].servers.is_some());
    }

    #[test]
    fn test_null_and_absent_paths() {
        let doc: Document = serde_json::from_value(json!({ "paths": null })).unwrap();
        assert!(doc.paths.is_none());
        let doc: Document = serde_json::from_value(json!({})).unwrap();
        assert!(doc.paths.is_none());
        let doc: Document = serde_yaml::from_str("paths:\n").unwrap();
        assert!(doc.paths.is_none());
    }

    #[test]
    fn test_non_extension_entries_still_validated() {
        let err = serde_json::from_value::<Document>(json!({ "paths": { "/users": true } }));
        assert!(err.is_err());
    }
}
