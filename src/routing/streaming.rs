//! Streaming endpoint detection.
//!
//! Responses for streaming endpoints get headers that keep every hop from
//! buffering the body. Which paths qualify is deployment data.

use crate::config::StreamingConfig;

/// Decides whether a path is a Server-Sent-Events endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamingPredicate {
    prefixes: Vec<String>,
    substrings: Vec<String>,
}

impl StreamingPredicate {
    pub fn new(prefixes: Vec<String>, substrings: Vec<String>) -> Self {
        Self { prefixes, substrings }
    }

    pub fn from_config(config: StreamingConfig) -> Self {
        Self::new(config.prefixes, config.substrings)
    }

    /// True if `path` starts with a configured prefix or contains a
    /// configured substring.
    pub fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
            || self.substrings.iter().any(|s| path.contains(s.as_str()))
    }

    /// Evaluate against the rewritten path first, then the original one.
    pub fn matches_any(&self, rewritten: Option<&str>, original: &str) -> bool {
        rewritten.is_some_and(|p| self.matches(p)) || self.matches(original)
    }
}
