//! Upstream failure kinds.

use axum::http::StatusCode;
use thiserror::Error;

/// The outbound call to the backend could not complete.
///
/// Transport failures are answered with a 500 JSON body; a path the gateway
/// refuses to forward gets a 400. The split otherwise only feeds logs and
/// metrics.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("backend did not respond within {0} seconds")]
    Timeout(u64),

    #[error("cannot build backend URL: {0}")]
    InvalidTarget(String),

    #[error("path contains dot segments: {0}")]
    DotSegment(String),
}

impl UpstreamError {
    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Unreachable(_) => "unreachable",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::InvalidTarget(_) => "invalid_target",
            UpstreamError::DotSegment(_) => "dot_segment",
        }
    }

    /// Status code the client sees for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamError::DotSegment(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a reqwest failure. Connect failures are checked first: a
    /// connect timeout also reports `is_timeout()` but is bounded by the
    /// connect limit, not `timeout_secs`.
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_connect() {
            UpstreamError::Unreachable(format!("connection failed: {}", source_chain(&error)))
        } else if error.is_timeout() {
            UpstreamError::Timeout(timeout_secs)
        } else {
            UpstreamError::Unreachable(source_chain(&error))
        }
    }
}

/// Render an error with its causes, since reqwest keeps the useful part
/// (refused, DNS failure) in the source chain.
fn source_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
