//! # Router Module
//!
//! Compiles the paths of an OpenAPI document into URL matchers and resolves
//! concrete request URLs back to the path template that declares them.
//!
//! ## Architecture
//!
//! Matching works in two phases:
//!
//! 1. **Compilation** ([`PatternMap::build`]): for every declared path, each
//!    applicable server (document servers, then the path's override servers)
//!    is expanded into its concrete base URLs, and each base URL is joined with
//!    the compiled path template into an anchored regex.
//!
//! 2. **Matching** ([`PatternMap::find`], [`match_url`]): the candidate URL is
//!    stripped of query and fragment, then tested against the map in path
//!    declaration order. The first path with an accepting matcher wins.
//!
//! ## Example
//!
//! ```
//! use brrtpath::{router::PatternMap, Document};
//!
//! let doc: Document = serde_yaml::from_str(r#"
//! servers:
//!   - url: https://{env}.example.com/v1
//!     variables:
//!       env: { default: api, enum: [sandbox] }
//! paths:
//!   /users/{id}: {}
//! "#).unwrap();
//!
//! let map = PatternMap::build(&doc).unwrap();
//! let m = map.find("https://sandbox.example.com/v1/users/42").unwrap().unwrap();
//! assert_eq!(m.path, "/users/{id}");
//! assert_eq!(m.get_param("id"), Some("42"));
//! ```

mod core;
mod map;
mod pattern;

pub use core::{match_url, match_url_value, match_url_with, normalize_url, PathMatch};
pub use map::PatternMap;
pub use pattern::{path_patterns, ParamVec, PathPattern, PathTemplate, MAX_INLINE_PARAMS};
