//! Header filtering between client, gateway and backend.
//!
//! # Responsibilities
//! - Copy inbound request headers to the backend request
//! - Copy backend response headers to the client response
//! - Strip hop-by-hop headers in both directions
//!
//! # Design Decisions
//! - Everything end-to-end is forwarded verbatim (auth, cookies, custom)
//! - `Host` is left to the HTTP client so it matches the backend origin
//! - `Content-Length` is dropped when the body is dropped

use axum::http::{header, HeaderMap, HeaderName};

/// Hop-by-hop headers (RFC 9110 §7.6.1) plus the legacy `Keep-Alive` and
/// `Proxy-Connection`.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-connection"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}

/// Headers listed in `Connection` are hop-by-hop for this message too.
fn connection_listed(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}

fn end_to_end(headers: &HeaderMap) -> HeaderMap {
    let listed = connection_listed(headers);
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) || listed.contains(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Headers for the outbound backend request.
pub fn outbound_request_headers(inbound: &HeaderMap, forward_body: bool) -> HeaderMap {
    let mut headers = end_to_end(inbound);
    headers.remove(header::HOST);
    if !forward_body {
        headers.remove(header::CONTENT_LENGTH);
    }
    headers
}

/// Headers copied from the backend response to the client response.
pub fn client_response_headers(upstream: &HeaderMap) -> HeaderMap {
    end_to_end(upstream)
}
