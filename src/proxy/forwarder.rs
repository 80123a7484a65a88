//! Outbound request construction and dispatch.
//!
//! # Responsibilities
//! - Build the backend URL from the rewritten path and original query
//! - Mirror method, end-to-end headers and (for non-GET/HEAD) the body
//! - Follow backend redirects
//! - Turn every transport failure into an [`UpstreamError`]
//!
//! # Design Decisions
//! - Request and response bodies are streamed, never buffered
//! - The response-head timeout only covers waiting for status + headers;
//!   a streamed body may run as long as the backend keeps it open
//! - Dropping the returned future or response aborts the backend call

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};

use crate::config::schema::TimeoutConfig;
use crate::proxy::error::UpstreamError;
use crate::proxy::target::BackendTarget;
use crate::security::headers::outbound_request_headers;

/// Maximum redirects followed before the response is handed back as-is.
const MAX_REDIRECTS: usize = 10;

/// Shared outbound client bound to one backend.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    target: BackendTarget,
    upstream_timeout: Option<Duration>,
}

impl Forwarder {
    /// Build the forwarder and its connection-pooled client.
    pub fn new(target: BackendTarget, timeouts: &TimeoutConfig) -> Result<Self, UpstreamError> {
        let mut builder = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .no_proxy();
        if timeouts.connect_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(timeouts.connect_secs));
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::InvalidTarget(e.to_string()))?;

        Ok(Self {
            client,
            target,
            upstream_timeout: (timeouts.upstream_secs > 0)
                .then(|| Duration::from_secs(timeouts.upstream_secs)),
        })
    }

    pub fn target(&self) -> &BackendTarget {
        &self.target
    }

    /// Forward `request` to `rewritten_path` on the backend.
    ///
    /// The backend response is returned untouched, including 4xx/5xx.
    pub async fn forward(
        &self,
        request: Request<Body>,
        rewritten_path: &str,
    ) -> Result<reqwest::Response, UpstreamError> {
        let (parts, body) = request.into_parts();
        let url = self.target.url_for(rewritten_path, parts.uri.query())?;

        let forward_body = carries_body(&parts.method);
        let headers = outbound_request_headers(&parts.headers, forward_body);

        tracing::debug!(
            method = %parts.method,
            url = %url,
            forward_body,
            "Forwarding to backend"
        );

        let mut outbound = self.client.request(parts.method, url).headers(headers);
        if forward_body {
            outbound = outbound.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }

        let timeout_secs = self.upstream_timeout.map_or(0, |d| d.as_secs());
        let send = outbound.send();
        let result = match self.upstream_timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| UpstreamError::Timeout(timeout_secs))?,
            None => send.await,
        };

        result.map_err(|e| UpstreamError::from_reqwest(e, timeout_secs))
    }
}

/// `GET` and `HEAD` never carry a body to the backend.
pub fn carries_body(method: &Method) -> bool {
    method != Method::GET && method != Method::HEAD
}
