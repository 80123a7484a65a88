//! Prefix matching and rewriting.
//!
//! # Design Decisions
//! - Path matching is case-sensitive, exact byte prefix
//! - No wildcard or pattern syntax
//! - No trailing-slash normalization: `/chat` also matches `/chatroom`

use crate::config::RouteConfig;

/// One frontend → backend prefix mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    frontend_prefix: String,
    backend_prefix: String,
}

impl RouteEntry {
    /// Create a new route entry.
    pub fn new(frontend_prefix: impl Into<String>, backend_prefix: impl Into<String>) -> Self {
        Self {
            frontend_prefix: frontend_prefix.into(),
            backend_prefix: backend_prefix.into(),
        }
    }

    pub fn frontend_prefix(&self) -> &str {
        &self.frontend_prefix
    }

    pub fn backend_prefix(&self) -> &str {
        &self.backend_prefix
    }

    /// True when the rewrite leaves paths unchanged.
    pub fn is_identity(&self) -> bool {
        self.frontend_prefix == self.backend_prefix
    }

    /// Rewrite `path` if it starts with this entry's frontend prefix.
    ///
    /// The remainder after the prefix is copied byte-for-byte.
    pub fn rewrite(&self, path: &str) -> Option<String> {
        let rest = path.strip_prefix(self.frontend_prefix.as_str())?;
        let mut rewritten = String::with_capacity(self.backend_prefix.len() + rest.len());
        rewritten.push_str(&self.backend_prefix);
        rewritten.push_str(rest);
        Some(rewritten)
    }
}

impl From<RouteConfig> for RouteEntry {
    fn from(config: RouteConfig) -> Self {
        Self::new(config.frontend_prefix, config.backend_prefix)
    }
}
