use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use super::types::Document;
use crate::error::{MatchError, Result};

/// Serialization format of a spec file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Yaml,
    Json,
}

impl SpecFormat {
    /// Detect the format from `.yaml`, `.yml` or `.json` (case-insensitive).
    ///
    /// # Errors
    ///
    /// [`MatchError::UnsupportedExtension`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(SpecFormat::Yaml),
            Some("json") => Ok(SpecFormat::Json),
            _ => Err(MatchError::UnsupportedExtension {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Where a document comes from.
#[derive(Debug, Clone)]
pub enum SpecSource {
    /// An already-typed document.
    Document(Document),
    /// An in-memory JSON/YAML value.
    Value(Value),
    /// A spec file, resolved against the base directory.
    File(PathBuf),
}

impl From<Document> for SpecSource {
    fn from(document: Document) -> Self {
        SpecSource::Document(document)
    }
}

impl From<Value> for SpecSource {
    fn from(value: Value) -> Self {
        SpecSource::Value(value)
    }
}

impl From<PathBuf> for SpecSource {
    fn from(path: PathBuf) -> Self {
        SpecSource::File(path)
    }
}

impl From<&Path> for SpecSource {
    fn from(path: &Path) -> Self {
        SpecSource::File(path.to_path_buf())
    }
}

/// Build a [`Document`] from an in-memory spec or a spec file.
///
/// Files are read from `base_dir.join(path)`; an absolute `path` replaces
/// `base_dir` entirely. YAML is used for `.yaml`/`.yml`, JSON for `.json`.
///
/// # Errors
///
/// - [`MatchError::MissingSpec`] for a null value or an empty file path
/// - [`MatchError::InvalidSpecType`] for a value that is not an object
/// - [`MatchError::MissingDirname`] for a file path without `base_dir`
/// - [`MatchError::UnsupportedExtension`], [`MatchError::Io`],
///   [`MatchError::Yaml`], [`MatchError::Json`] while loading files
pub fn build_document(source: impl Into<SpecSource>, base_dir: Option<&Path>) -> Result<Document> {
    match source.into() {
        SpecSource::Document(document) => Ok(document),
        SpecSource::Value(value) => document_from_loader_value(value),
        SpecSource::File(path) => {
            if path.as_os_str().is_empty() {
                return Err(MatchError::MissingSpec);
            }
            let base_dir = base_dir.ok_or(MatchError::MissingDirname)?;
            load_document_file(&base_dir.join(path))
        }
    }
}

/// Build a [`Document`] from loosely-typed inputs, as received across a
/// dynamic boundary (bindings, JSON-RPC, config values).
///
/// A string `spec` is a file path resolved against `dirname`; an object is
/// the document itself.
///
/// # Errors
///
/// As [`build_document`], plus [`MatchError::DirnameNotString`] when
/// `dirname` is present but not a string.
pub fn build_document_from_value(spec: &Value, dirname: Option<&Value>) -> Result<Document> {
    if is_falsy(spec) {
        return Err(MatchError::MissingSpec);
    }
    match spec {
        Value::String(path) => {
            let base_dir = match dirname {
                None => return Err(MatchError::MissingDirname),
                Some(dir) if is_falsy(dir) => return Err(MatchError::MissingDirname),
                Some(Value::String(dir)) => PathBuf::from(dir),
                Some(_) => return Err(MatchError::DirnameNotString),
            };
            build_document(PathBuf::from(path), Some(base_dir.as_path()))
        }
        other => build_document(other.clone(), None),
    }
}

/// Read and parse a spec file.
///
/// # Errors
///
/// [`MatchError::UnsupportedExtension`] is checked before the file is read.
pub fn load_document_file(path: &Path) -> Result<Document> {
    let format = SpecFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|source| MatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document = parse_document(&content, format).map_err(|err| match err {
        ParseError::Yaml(source) => MatchError::Yaml {
            path: path.to_path_buf(),
            source,
        },
        ParseError::Json(source) => MatchError::Json {
            path: path.to_path_buf(),
            source,
        },
    })?;

    info!(
        spec_path = %path.display(),
        format = ?format,
        paths_count = document.paths.as_ref().map_or(0, |p| p.len()),
        "Specification loaded"
    );
    Ok(document)
}

/// Parser failure before a file path is attached.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error(transparent)]
    Yaml(serde_yaml::Error),
    #[error(transparent)]
    Json(serde_json::Error),
}

/// Parse spec text in the given format.
///
/// # Errors
///
/// The underlying YAML or JSON error.
pub fn parse_document(content: &str, format: SpecFormat) -> std::result::Result<Document, ParseError> {
    match format {
        SpecFormat::Yaml => serde_yaml::from_str(content).map_err(ParseError::Yaml),
        SpecFormat::Json => serde_json::from_str(content).map_err(ParseError::Json),
    }
}

/// `null`, `false`, `0` and `""`: values a dynamic caller uses for "not given".
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn document_from_loader_value(value: Value) -> Result<Document> {
    if is_falsy(&value) {
        return Err(MatchError::MissingSpec);
    }
    match value {
        Value::Object(_) => {
            debug!("Building document from in-memory specification");
            serde_json::from_value(value).map_err(MatchError::InvalidDocument)
        }
        _ => Err(MatchError::InvalidSpecType),
    }
}
