//! Path template and full-URL pattern compilation.
//!
//! A path template such as `/companies/{companyId}/products` is compiled into a
//! regex *body* in which every `{name}` placeholder becomes a lazy capture of
//! one path segment (`[^/#?]+?`). A placeholder directly preceded by `/` or `.`
//! folds that character into a non-capturing group:
//!
//! ```text
//! /compagnies/{companyId}/products/{productId}
//!   -> /compagnies(?:/([^/#?]+?))/products(?:/([^/#?]+?))
//! ```
//!
//! The body is used two ways:
//!
//! - [`PathTemplate::regex`]: unanchored, case-insensitive partial matcher that
//!   requires a delimiter (`/`, `#`, `?`) or the end of input after the path.
//! - [`PathPattern`]: `^` + concrete base URL + body + optional trailing
//!   delimiter + `$`, one per base URL the path is served under.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;
use tracing::debug;

use crate::config::MatchConfig;
use crate::error::{MatchError, Result};
use crate::spec::{path_base_urls, Document};

/// Maximum number of captured path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured path parameters, in template order.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// `{name}` placeholders. Names may hold anything but `/` and braces (`user-id`, `api.version`).
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([^{}/]+)\}").expect("placeholder regex should be valid")
});

const SEGMENT_CAPTURE: &str = "([^/#?]+?)";
const DELIMITER_CLASS: &str = "[/#?]";

/// A compiled OpenAPI path template.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    template: String,
    body: String,
    param_names: Vec<Arc<str>>,
    regex: Regex,
}

impl PathTemplate {
    /// Compile a path template.
    ///
    /// # Errors
    ///
    /// [`MatchError::MissingPath`] if `template` is empty.
    pub fn compile(template: &str) -> Result<Self> {
        if template.is_empty() {
            return Err(MatchError::MissingPath);
        }

        let mut body = String::with_capacity(template.len() + 16);
        let mut param_names = Vec::with_capacity(template.matches('{').count());
        let mut last = 0;

        for caps in PLACEHOLDER_REGEX.captures_iter(template) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let literal = &template[last..whole.start()];
            match literal.char_indices().last() {
                Some((idx, prefix @ ('/' | '.'))) => {
                    body.push_str(&regex::escape(&literal[..idx]));
                    body.push_str("(?:");
                    body.push_str(&regex::escape(prefix.encode_utf8(&mut [0; 4])));
                    body.push_str(SEGMENT_CAPTURE);
                    body.push(')');
                }
                _ => {
                    body.push_str(&regex::escape(literal));
                    body.push_str(SEGMENT_CAPTURE);
                }
            }
            param_names.push(Arc::from(name.as_str()));
            last = whole.end();
        }
        body.push_str(&regex::escape(&template[last..]));

        let end_delimited = template.ends_with(['/', '#', '?']);
        let partial = if end_delimited {
            format!("(?i){body}")
        } else {
            format!("(?i){body}(?:{DELIMITER_CLASS}|$)")
        };
        let regex = Regex::new(&partial).map_err(|source| MatchError::InvalidPattern {
            pattern: partial.clone(),
            source,
        })?;

        Ok(Self {
            template: template.to_string(),
            body,
            param_names,
            regex,
        })
    }

    /// The template as declared, e.g. `/users/{id}`.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Regex source of the path, without anchors, flags or trailing delimiter.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Placeholder names in template order.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Unanchored, case-insensitive matcher for the path alone.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Full matcher for one concrete base URL + path template combination.
#[derive(Debug, Clone)]
pub struct PathPattern {
    base_url: String,
    regex: Regex,
    param_names: Vec<Arc<str>>,
}

impl PathPattern {
    /// Assemble `^` + base URL + path body + optional delimiter + `$`.
    ///
    /// With `escape_base_url` the base URL only matches itself literally;
    /// otherwise it is spliced in as regex source.
    ///
    /// # Errors
    ///
    /// [`MatchError::InvalidPattern`] if the assembled source does not compile,
    /// which can only happen with an unescaped base URL.
    pub fn new(base_url: &str, template: &PathTemplate, escape_base_url: bool) -> Result<Self> {
        let base = if escape_base_url {
            regex::escape(base_url)
        } else {
            base_url.to_string()
        };
        let source = format!("^{base}{}{DELIMITER_CLASS}?$", template.body());
        let regex = Regex::new(&source).map_err(|source_err| MatchError::InvalidPattern {
            pattern: source.clone(),
            source: source_err,
        })?;

        Ok(Self {
            base_url: base_url.to_string(),
            regex,
            param_names: template.param_names().to_vec(),
        })
    }

    /// Concrete base URL this pattern was built for.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Compiled regex source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    #[inline]
    #[must_use]
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Match `url` and return the captured path parameters.
    #[must_use]
    pub fn captures(&self, url: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(url)?;
        // Groups from an unescaped base URL come before the path's own groups.
        let offset = self
            .regex
            .captures_len()
            .saturating_sub(self.param_names.len());
        Some(
            self.param_names
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(offset + i)
                        .map(|m| (Arc::clone(name), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

/// Compile one [`PathPattern`] per concrete base URL under which `path` is served.
///
/// # Errors
///
/// Any server expansion error (see [`crate::spec::path_base_urls`]) or
/// pattern compilation error.
pub fn path_patterns(
    document: &Document,
    path: &str,
    config: &MatchConfig,
) -> Result<Vec<PathPattern>> {
    if path.is_empty() {
        return Err(MatchError::MissingPath);
    }
    let template = PathTemplate::compile(path)?;
    path_base_urls(document, path)?
        .iter()
        .map(|base_url| {
            let pattern = PathPattern::new(base_url, &template, config.escape_server_urls)?;
            debug!(
                path = %path,
                base_url = %base_url,
                pattern = %pattern.as_str(),
                "Compiled path pattern"
            );
            Ok::<_, MatchError>(pattern)
        })
        .collect()
}
