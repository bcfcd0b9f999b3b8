//! Error types for document loading, pattern compilation and URL matching.
//!
//! Every failure aborts the call that produced it. There are no partial results.
//! A URL that matches no declared path is **not** an error: the matcher
//! returns `Ok(None)` for that case.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T, E = MatchError> = std::result::Result<T, E>;

/// Broad classification of a [`MatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required argument is absent (or empty).
    InputMissing,
    /// An argument is present but has the wrong shape.
    InputWrongType,
    /// An argument has the right shape but fails syntactic validation.
    InputMalformed,
    /// The document lacks a nested field the matcher needs.
    SchemaIncomplete,
    /// Reading a spec file failed.
    Io,
    /// A spec file or value could not be parsed into a document.
    Parse,
}

/// Errors raised while building documents, compiling patterns or matching URLs.
#[derive(Debug, Error)]
pub enum MatchError {
    /// No specification was supplied.
    #[error("specification is not provided")]
    MissingSpec,

    /// The document handed to the matcher is not an object.
    #[error("specification must be an object")]
    SpecNotObject,

    /// The loader input is neither a document object nor a file path.
    #[error("specification must be an object or a path to a specification file")]
    InvalidSpecType,

    /// No URL was supplied.
    #[error("url is not provided")]
    MissingUrl,

    /// The URL argument is not a string.
    #[error("url must be a string")]
    UrlNotString,

    /// The URL failed syntactic parsing.
    #[error("url must be a valid url: '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A spec file path was given without a base directory.
    #[error("dirname is not provided")]
    MissingDirname,

    /// The base directory argument is not a string.
    #[error("dirname must be a string")]
    DirnameNotString,

    /// Spec files must end in `.json`, `.yaml` or `.yml`.
    #[error("specification file must be a json, yaml or yml file: {}", path.display())]
    UnsupportedExtension { path: PathBuf },

    /// A server variable has no (or an empty) `default`.
    #[error("server variable '{name}' has no default value")]
    MissingDefault { name: String },

    /// A server object has no (or an empty) `url`.
    #[error("server does not contain url")]
    MissingServerUrl,

    /// An expanded URL has an empty `url` field.
    #[error("url object does not contain \"url\" field")]
    MissingUrlField,

    /// An empty path template was supplied.
    #[error("path is not provided")]
    MissingPath,

    /// The document has no `paths` object.
    #[error("there is no path in schema")]
    NoPathsDeclared,

    /// The requested path template is not declared under `paths`.
    #[error("schema does not contain path '{path}'")]
    PathNotDeclared { path: String },

    /// A JSON value could not be converted into a [`crate::Document`].
    #[error("specification object is not a valid document: {0}")]
    InvalidDocument(#[source] serde_json::Error),

    #[error("failed to read specification file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML specification {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON specification {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A generated pattern did not compile. Only reachable when server URLs
    /// are spliced unescaped (see [`crate::MatchConfig::escape_server_urls`]).
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl MatchError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::MissingSpec
            | MatchError::MissingUrl
            | MatchError::MissingDirname
            | MatchError::MissingPath => ErrorKind::InputMissing,
            MatchError::SpecNotObject
            | MatchError::InvalidSpecType
            | MatchError::UrlNotString
            | MatchError::DirnameNotString => ErrorKind::InputWrongType,
            MatchError::InvalidUrl { .. }
            | MatchError::UnsupportedExtension { .. }
            | MatchError::InvalidPattern { .. } => ErrorKind::InputMalformed,
            MatchError::MissingDefault { .. }
            | MatchError::MissingServerUrl
            | MatchError::MissingUrlField
            | MatchError::NoPathsDeclared
            | MatchError::PathNotDeclared { .. } => ErrorKind::SchemaIncomplete,
            MatchError::Io { .. } => ErrorKind::Io,
            MatchError::InvalidDocument(_) | MatchError::Yaml { .. } | MatchError::Json { .. } => {
                ErrorKind::Parse
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_taxonomy() {
        assert_eq!(MatchError::MissingSpec.kind(), ErrorKind::InputMissing);
        assert_eq!(MatchError::UrlNotString.kind(), ErrorKind::InputWrongType);
        assert_eq!(
            MatchError::UnsupportedExtension {
                path: PathBuf::from("spec.txt")
            }
            .kind(),
            ErrorKind::InputMalformed
        );
        assert_eq!(
            MatchError::PathNotDeclared {
                path: "/x".into()
            }
            .kind(),
            ErrorKind::SchemaIncomplete
        );
    }

    #[test]
    fn test_messages_name_the_failure() {
        let err = MatchError::MissingDefault {
            name: "protocol".into(),
        };
        assert_eq!(err.to_string(), "server variable 'protocol' has no default value");
        assert_eq!(MatchError::MissingSpec.to_string(), "specification is not provided");
    }
}
