//! # brrtpath
//!
//! **brrtpath** resolves a concrete request URL back to the path template an
//! [OpenAPI 3.0/3.1](https://spec.openapis.org/oas/v3.1.0) document declares for it:
//!
//! ```text
//! https://api.example.com/v1/users/42?expand=posts   ->   /users/{id}
//! ```
//!
//! API gateways, routers and observability pipelines use this to attribute
//! metrics, logs or policy to the logical operation instead of to raw URLs.
//!
//! ## Architecture
//!
//! - **[`spec`]** - Document model (`servers`, `paths`, path-level `servers`),
//!   the document loader, and server URL expansion: server variables become value
//!   sets, value sets become every concrete base URL.
//! - **[`router`]** - Path template compilation, the per-document
//!   [`PatternMap`] and the URL matcher.
//! - **[`config`]** - [`MatchConfig`] options for base-URL escaping and
//!   multi-server matching.
//! - **[`error`]** - [`MatchError`], one variant per named failure.
//!
//! ### Matching Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Core as router::match_url
//!     participant Map as PatternMap
//!     participant Servers as spec::path_base_urls
//!     participant Pattern as PathPattern
//!
//!     Caller->>Core: match_url(&doc, url)
//!     Core->>Core: validate + strip query/fragment
//!     Core->>Map: PatternMap::build(&doc)
//!     loop every declared path
//!         Map->>Servers: document servers + path servers
//!         Servers-->>Map: concrete base URLs
//!         Map->>Pattern: ^ base URL + path body $
//!     end
//!     Core->>Map: find_normalized(url)
//!     Map-->>Core: first matching path (declaration order)
//!     Core-->>Caller: Some("/users/{id}") / None
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use brrtpath::{build_document, match_url};
//! use std::path::{Path, PathBuf};
//!
//! let doc = build_document(PathBuf::from("openapi.yaml"), Some(Path::new("./specs")))?;
//! let path = match_url(&doc, "https://api.example.com/v1/users/42")?;
//! println!("{path:?}");
//! # Ok::<(), brrtpath::MatchError>(())
//! ```
//!
//! [`match_url`] rebuilds the pattern map on every call. For repeated lookups
//! build a [`PatternMap`] once and call [`PatternMap::find`], which also
//! returns the captured path parameters.
//!
//! ## Behaviour Notes
//!
//! - Paths are tried in declaration order; the first match wins.
//! - Only URL shape is matched: no HTTP methods, no query/fragment.
//! - A path with no applicable server never matches.
//! - Server URLs are matched literally against the absolute candidate URL,
//!   so relative server URLs (`/v1`) never match.
//!
//! ## Logging
//!
//! The crate emits `tracing` events (`info` for loaded specs and built maps,
//! `debug` for compiled patterns and match outcomes) and never installs a
//! subscriber.

pub mod config;
pub mod error;
pub mod router;
pub mod spec;

pub use config::{MatchConfig, ServerMatch};
pub use error::{ErrorKind, MatchError, Result};
pub use router::{match_url, match_url_value, match_url_with, PathMatch, PatternMap};
pub use spec::{build_document, build_document_from_value, Document, PathItem, Server, ServerVariable, SpecSource};
