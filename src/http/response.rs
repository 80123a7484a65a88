//! Response adaptation.
//!
//! # Responsibilities
//! - Turn a backend or passthrough response into the client response
//! - Overlay CORS headers on every response
//! - Overlay anti-buffering headers on streaming endpoints
//! - Render upstream failures as `500 {"error": ...}`
//!
//! # Design Decisions
//! - Bodies are handed over as streams; nothing is collected in memory
//! - A new response is assembled from status + filtered headers + body,
//!   then overlays are applied; the input response is consumed, not patched
//! - Edge values win over backend values for every overlaid header

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Response, StatusCode};
use axum::{response::IntoResponse, Json};
use serde::Serialize;

use crate::proxy::UpstreamError;
use crate::security::headers::client_response_headers;
use crate::security::CorsPolicy;

/// `X-Accel-Buffering: no` turns off nginx-style intermediary buffering.
pub const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// JSON body of a synthesized error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Adapt a backend response; the body keeps streaming from the backend.
pub fn from_upstream(upstream: reqwest::Response, cors: &CorsPolicy, streaming: bool) -> Response<Body> {
    let status = upstream.status();
    let headers = client_response_headers(upstream.headers());
    let body = Body::from_stream(upstream.bytes_stream());
    assemble(status, headers, body, cors, streaming)
}

/// Adapt a response produced by the passthrough fallback.
pub fn from_passthrough(response: Response<Body>, cors: &CorsPolicy, streaming: bool) -> Response<Body> {
    let (parts, body) = response.into_parts();
    let headers = client_response_headers(&parts.headers);
    assemble(parts.status, headers, body, cors, streaming)
}

/// Render an upstream failure with the status from [`UpstreamError::status`].
/// CORS headers are still attached so the browser can read the error instead
/// of reporting an opaque network failure.
pub fn from_upstream_error(error: &UpstreamError, cors: &CorsPolicy) -> Response<Body> {
    let body = ErrorBody {
        error: error.to_string(),
    };
    let (parts, body) = (error.status(), Json(body))
        .into_response()
        .into_parts();
    assemble(parts.status, parts.headers, body, cors, false)
}

fn assemble(
    status: StatusCode,
    mut headers: HeaderMap,
    body: Body,
    cors: &CorsPolicy,
    streaming: bool,
) -> Response<Body> {
    cors.overlay(&mut headers);
    if streaming {
        overlay_streaming(&mut headers);
    }

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Headers that keep a Server-Sent-Events body flowing through every hop.
pub fn overlay_streaming(headers: &mut HeaderMap) {
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(X_ACCEL_BUFFERING, HeaderValue::from_static("no"));
}
