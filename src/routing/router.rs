//! Route lookup.
//!
//! # Responsibilities
//! - Store the compiled route table
//! - Look up the first matching entry for a path
//! - Return the rewritten path or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan in declaration order (acceptable for typical route counts)
//! - Declaration order breaks ties, not prefix length

use crate::config::RouteConfig;
use crate::routing::matcher::RouteEntry;

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Entry that matched.
    pub entry: &'a RouteEntry,
    /// Backend-facing path.
    pub rewritten_path: String,
}

/// Ordered, immutable route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build the table from validated configuration, keeping declaration order.
    pub fn from_config(routes: Vec<RouteConfig>) -> Self {
        Self {
            entries: routes.into_iter().map(RouteEntry::from).collect(),
        }
    }

    /// Find the first entry whose frontend prefix `path` starts with.
    ///
    /// `None` means the request is not an API call and belongs to the
    /// passthrough fallback.
    pub fn route(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.entries.iter().find_map(|entry| {
            entry
                .rewrite(path)
                .map(|rewritten_path| RouteMatch { entry, rewritten_path })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        RouteTable::from_config(vec![
            RouteConfig::new("/chat", "/api/chat"),
            RouteConfig::new("/agent-chat", "/api/react-search-streaming"),
            RouteConfig::new("/api/", "/api/"),
        ])
    }

    #[test]
    fn test_first_match_rewrites() {
        let table = table();
        let matched = table.route("/chat/123").unwrap();
        assert_eq!(matched.rewritten_path, "/api/chat/123");
        assert_eq!(matched.entry.frontend_prefix(), "/chat");
    }

    #[test]
    fn test_identity_route_counts_as_match() {
        let table = table();
        let matched = table.route("/api/models").unwrap();
        assert_eq!(matched.rewritten_path, "/api/models");
        assert!(matched.entry.is_identity());
    }

    #[test]
    fn test_no_match() {
        assert!(table().route("/about").is_none());
        assert!(table().route("/").is_none());
        assert!(RouteTable::default().route("/chat").is_none());
    }

    #[test]
    fn test_declaration_order_beats_length() {
        let table = RouteTable::from_config(vec![
            RouteConfig::new("/a", "/short"),
            RouteConfig::new("/a/b", "/long"),
        ]);
        assert_eq!(table.route("/a/b/c").unwrap().rewritten_path, "/short/b/c");
    }

    #[test]
    fn test_rewrite_is_injective_within_route() {
        let table = table();
        let inputs = ["/chat", "/chat/", "/chat/a", "/chat/b", "/chat/a/b"];
        let outputs: std::collections::HashSet<_> = inputs
            .iter()
            .map(|p| table.route(p).unwrap().rewritten_path)
            .collect();
        assert_eq!(outputs.len(), inputs.len());
    }
}
