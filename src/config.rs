//! # Matcher Configuration
//!
//! [`MatchConfig`] controls the two places where pattern compilation can either
//! follow the historical behaviour or the corrected one:
//!
//! - **Server URL escaping**: concrete base URLs are spliced into each matcher.
//!   With escaping on (the default) a `.` in `api.example.com` only matches a
//!   literal dot. With escaping off, base URLs are treated as raw regex source.
//! - **Server matching**: a path reachable through several servers compiles to
//!   several matchers. [`ServerMatch::AnyServer`] (the default) keeps all of them.
//!   [`ServerMatch::LastServer`] keeps only the last compiled matcher per path.
//!
//! The config is plain data with serde support, so hosts can embed it in their
//! own YAML/JSON configuration:
//!
//! ```yaml
//! path_matcher:
//!   escape_server_urls: true
//!   server_match: any_server
//! ```

use serde::{Deserialize, Serialize};

/// Which compiled matchers are kept per path template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerMatch {
    /// Keep one matcher per applicable concrete base URL; any may match.
    #[default]
    AnyServer,
    /// Keep only the last compiled matcher for each path.
    LastServer,
}

/// Options for building a [`crate::PatternMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Escape regex metacharacters in concrete base URLs (default: `true`).
    pub escape_server_urls: bool,
    /// Matcher retention policy per path (default: [`ServerMatch::AnyServer`]).
    pub server_match: ServerMatch,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            escape_server_urls: true,
            server_match: ServerMatch::AnyServer,
        }
    }
}

impl MatchConfig {
    /// Historical matcher behaviour: raw base URLs and only the last compiled
    /// matcher per path.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            escape_server_urls: false,
            server_match: ServerMatch::LastServer,
        }
    }
}
