//! Key namespace prefix handling
//!
//! Operators commonly run Redis with a client-side key prefix (e.g.
//! `laravel:`). The server only ever sees raw (prefixed) keys; the
//! manager's API deals in logical (unprefixed) names. This module is the
//! one place that translates between the two.

use serde::{Deserialize, Serialize};

/// A configured key namespace prefix, read once per connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPrefix(String);

impl KeyPrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self(prefix.into())
    }

    /// Strip the prefix from a raw key, yielding the logical name.
    ///
    /// Only an anchored, literal leading match is removed; keys that do
    /// not start with the prefix come back unchanged. An empty prefix is
    /// a no-op.
    pub fn strip<'a>(&self, raw: &'a str) -> &'a str {
        raw.strip_prefix(self.0.as_str()).unwrap_or(raw)
    }

    /// Apply the prefix to a logical key, yielding the raw wire name
    pub fn apply(&self, logical: &str) -> String {
        format!("{}{}", self.0, logical)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for KeyPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
