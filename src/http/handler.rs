//! Per-request pipeline: preflight → route → forward → adapt.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::http::request::request_id;
use crate::http::response;
use crate::observability::metrics;
use crate::passthrough::Passthrough;
use crate::proxy::Forwarder;
use crate::routing::{RouteTable, StreamingPredicate};
use crate::security::CorsPolicy;

/// Immutable state shared by all requests.
#[derive(Clone)]
pub struct GatewayState {
    pub routes: Arc<RouteTable>,
    pub cors: Arc<CorsPolicy>,
    pub streaming: Arc<StreamingPredicate>,
    pub forwarder: Forwarder,
    pub passthrough: Passthrough,
}

/// Main gateway handler, mounted as the router fallback so it sees every
/// method and path.
pub async fn gateway_handler(State(state): State<GatewayState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_id = request_id(request.headers()).to_string();

    // 1. Preflight
    if method == Method::OPTIONS {
        tracing::debug!(request_id = %request_id, path = %path, "Answering preflight");
        let response = state.cors.preflight_response();
        metrics::record_request(method.as_str(), response.status().as_u16(), "preflight", start_time);
        return response;
    }

    // 2. Route
    let Some(matched) = state.routes.route(&path) else {
        let streaming = state.streaming.matches(&path);
        tracing::debug!(
            request_id = %request_id,
            path = %path,
            fallback = state.passthrough.kind(),
            "No route matched, passing through"
        );
        let response = state.passthrough.serve(request).await;
        let response = response::from_passthrough(response, &state.cors, streaming);
        metrics::record_request(method.as_str(), response.status().as_u16(), "passthrough", start_time);
        return response;
    };

    let identity = matched.entry.is_identity();
    let rewritten = matched.rewritten_path;
    let streaming = state.streaming.matches_any(Some(&rewritten), &path);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        rewritten = %rewritten,
        identity,
        streaming,
        "Proxying request"
    );

    // 3. Forward, 4. Adapt
    match state.forwarder.forward(request, &rewritten).await {
        Ok(upstream) => {
            let status = upstream.status();
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                rewritten = %rewritten,
                status = status.as_u16(),
                streaming,
                "Backend responded"
            );
            metrics::record_request(method.as_str(), status.as_u16(), "upstream", start_time);
            response::from_upstream(upstream, &state.cors, streaming)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                rewritten = %rewritten,
                error = %e,
                "Upstream error"
            );
            metrics::record_upstream_error(e.kind());
            let response = response::from_upstream_error(&e, &state.cors);
            metrics::record_request(method.as_str(), response.status().as_u16(), "error", start_time);
            response
        }
    }
}
