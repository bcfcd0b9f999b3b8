//! Server URL expansion.
//!
//! For a declared path this module answers "which concrete base URLs can this
//! path be served under?". It collects the servers that apply to the path
//! (document servers first, then the path's own override servers), expands
//! each server's variables into value sets, enumerates the cartesian product
//! of those sets and substitutes every assignment into the server URL.
//!
//! ```text
//! Server { url: "https://{env}.example.com/{version}", variables: env, version }
//!   -> ExpandedUrl     { env: [test, live], version: [v1] }
//!   -> UrlAssignments  [{env: test, version: v1}, {env: live, version: v1}]
//!   -> base URLs       ["https://test.example.com/v1", "https://live.example.com/v1"]
//! ```

use indexmap::IndexMap;
use tracing::warn;

use super::types::{
    Document, ExpandedUrl, Server, ServerVariable, UrlAssignments, VariableAssignment,
    VariableValueSet,
};
use crate::error::{MatchError, Result};

/// Build the ordered value set of a server variable.
///
/// The default always comes first, followed by each `enum` entry not already
/// present, in `enum` order. `name` is only used for error reporting.
///
/// # Errors
///
/// [`MatchError::MissingDefault`] if `default` is absent or empty.
pub fn variable_values(name: &str, variable: &ServerVariable) -> Result<VariableValueSet> {
    let default = match variable.default.as_deref() {
        Some(d) if !d.is_empty() => d,
        _ => {
            return Err(MatchError::MissingDefault {
                name: name.to_string(),
            })
        }
    };

    let mut values = vec![default.to_string()];
    for value in variable.enum_values.iter().flatten() {
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    Ok(values)
}

/// Expand a server declaration into its URL template and per-variable value sets.
///
/// # Errors
///
/// [`MatchError::MissingServerUrl`] if the server has no `url`, or any error
/// from [`variable_values`].
pub fn extract_server_url(server: &Server) -> Result<ExpandedUrl> {
    let url = match server.url.as_deref() {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => return Err(MatchError::MissingServerUrl),
    };

    let mut variables = IndexMap::new();
    for (name, variable) in server.variables.iter().flatten() {
        variables.insert(name.clone(), variable_values(name, variable)?);
    }

    Ok(ExpandedUrl { url, variables })
}

/// Enumerate every assignment of values to variables (the cartesian product).
///
/// Variables are folded in declaration order: the first variable varies
/// slowest and the last varies fastest. For `{a: [0, 1], b: [0, 1, 2]}` the
/// result is `a0b0, a0b1, a0b2, a1b0, a1b1, a1b2`.
///
/// An empty mapping yields an empty list, not a list holding one empty
/// assignment. A variable with an empty value set empties the whole product.
#[must_use]
pub fn enumerate_assignments(
    variables: &IndexMap<String, VariableValueSet>,
) -> Vec<VariableAssignment> {
    let mut iter = variables.iter();
    let Some((first_name, first_values)) = iter.next() else {
        return Vec::new();
    };

    let mut assignments: Vec<VariableAssignment> = first_values
        .iter()
        .map(|value| {
            let mut assignment = VariableAssignment::with_capacity(variables.len());
            assignment.insert(first_name.clone(), value.clone());
            assignment
        })
        .collect();

    for (name, values) in iter {
        assignments = assignments
            .into_iter()
            .flat_map(|partial| {
                values.iter().map(move |value| {
                    let mut assignment = partial.clone();
                    assignment.insert(name.clone(), value.clone());
                    assignment
                })
            })
            .collect();
    }

    assignments
}

/// Pair an expanded server URL with the full list of its variable assignments.
///
/// # Errors
///
/// [`MatchError::MissingUrlField`] if `expanded.url` is empty.
pub fn pair_assignments(expanded: &ExpandedUrl) -> Result<UrlAssignments> {
    if expanded.url.is_empty() {
        return Err(MatchError::MissingUrlField);
    }
    Ok(UrlAssignments {
        url: expanded.url.clone(),
        variables: enumerate_assignments(&expanded.variables),
    })
}

/// Document-level servers, or an empty slice when none are declared.
#[must_use]
pub fn document_servers(document: &Document) -> &[Server] {
    document.servers.as_deref().unwrap_or_default()
}

/// Servers applicable to `path`: document servers followed by the path's
/// own `servers` override.
///
/// # Errors
///
/// - [`MatchError::MissingPath`] if `path` is empty
/// - [`MatchError::NoPathsDeclared`] if the document has no `paths`
/// - [`MatchError::PathNotDeclared`] if `path` is not a key of `paths`
pub fn path_servers<'a>(document: &'a Document, path: &str) -> Result<Vec<&'a Server>> {
    if path.is_empty() {
        return Err(MatchError::MissingPath);
    }
    let paths = document.paths.as_ref().ok_or(MatchError::NoPathsDeclared)?;
    let item = paths.get(path).ok_or_else(|| MatchError::PathNotDeclared {
        path: path.to_string(),
    })?;

    let path_level = item.servers.as_deref().unwrap_or_default();
    Ok(document_servers(document)
        .iter()
        .chain(path_level)
        .collect())
}

/// Every server applicable to `path`, expanded and paired with its assignments.
///
/// # Errors
///
/// Any error from [`path_servers`], [`extract_server_url`] or [`pair_assignments`].
pub fn expand_path_urls(document: &Document, path: &str) -> Result<Vec<UrlAssignments>> {
    path_servers(document, path)?
        .into_iter()
        .map(|server| pair_assignments(&extract_server_url(server)?))
        .collect()
}

/// Substitute each assignment into the URL template.
///
/// With no assignments the raw URL is returned untouched, including any
/// literal `{...}` text. Every occurrence of a placeholder is replaced.
///
/// # Errors
///
/// [`MatchError::MissingUrlField`] if `pair.url` is empty.
pub fn concrete_base_urls(pair: &UrlAssignments) -> Result<Vec<String>> {
    if pair.url.is_empty() {
        return Err(MatchError::MissingUrlField);
    }
    if pair.variables.is_empty() {
        if pair.url.contains('{') {
            warn!(url = %pair.url, "Server URL has no variables; placeholders kept verbatim");
        }
        return Ok(vec![pair.url.clone()]);
    }

    Ok(pair
        .variables
        .iter()
        .map(|assignment| {
            assignment
                .iter()
                .fold(pair.url.clone(), |url, (name, value)| {
                    url.replace(&format!("{{{name}}}"), value)
                })
        })
        .collect())
}

/// Every concrete base URL under which `path` may be served, in server order.
///
/// # Errors
///
/// Any error from [`expand_path_urls`] or [`concrete_base_urls`].
pub fn path_base_urls(document: &Document, path: &str) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    for pair in expand_path_urls(document, path)? {
        urls.extend(concrete_base_urls(&pair)?);
    }
    Ok(urls)
}
