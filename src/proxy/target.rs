//! Backend origin and target URL construction.

use url::Url;

use crate::proxy::error::UpstreamError;

/// The backend every rewritten request resolves against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    base_url: Url,
}

impl BackendTarget {
    /// Parse the configured base URL.
    pub fn parse(base_url: &str) -> Result<Self, UpstreamError> {
        let base_url =
            Url::parse(base_url).map_err(|e| UpstreamError::InvalidTarget(e.to_string()))?;
        Ok(Self { base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the outbound URL for `rewritten_path`.
    ///
    /// Only the path and query of the base URL are touched, so scheme, host
    /// and port always come from configuration. Any base path is kept as a
    /// mount point. A rewritten path without a leading `/` gets one, and a
    /// path with `.` or `..` segments is refused since resolving them would
    /// leave the mount point. The original query string is appended after
    /// whatever query the rewritten path carries, byte-for-byte.
    pub fn url_for(
        &self,
        rewritten_path: &str,
        original_query: Option<&str>,
    ) -> Result<Url, UpstreamError> {
        let (path, rewritten_query) = match rewritten_path.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rewritten_path, None),
        };

        if has_dot_segment(path) {
            return Err(UpstreamError::DotSegment(rewritten_path.to_string()));
        }

        let mount = self.base_url.path().trim_end_matches('/');
        let separator = if path.starts_with('/') { "" } else { "/" };

        let mut url = self.base_url.clone();
        url.set_path(&format!("{mount}{separator}{path}"));

        let rewritten_query = rewritten_query.filter(|q| !q.is_empty());
        let query = match (rewritten_query, original_query.filter(|q| !q.is_empty())) {
            (Some(existing), Some(original)) => Some(format!("{existing}&{original}")),
            (Some(existing), None) => Some(existing.to_string()),
            (None, Some(original)) => Some(original.to_string()),
            (None, None) => None,
        };
        url.set_query(query.as_deref());
        url.set_fragment(None);

        Ok(url)
    }
}

/// True if any segment is `.` or `..`, including percent-encoded forms.
fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}
