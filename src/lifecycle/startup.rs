//! Startup orchestration.
//!
//! # Responsibilities
//! - Compile validated configuration into request-time structures
//! - Log a summary of what the gateway will do
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The backend URL and CORS policy are resolved here, never per request

use thiserror::Error;

use crate::config::{GatewayConfig, ValidationError};
use crate::proxy::UpstreamError;

/// Error raised while turning configuration into a running gateway.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid CORS policy: {0}")]
    Cors(#[from] ValidationError),

    #[error("invalid backend: {0}")]
    Backend(#[from] UpstreamError),
}

/// Log the effective configuration.
pub fn log_summary(config: &GatewayConfig) {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        routes = config.routes.len(),
        allowed_origin = %config.cors.allowed_origin,
        allow_credentials = config.cors.allow_credentials,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        static_dir = config.passthrough.static_dir.as_deref().unwrap_or("-"),
        "Configuration loaded"
    );
    for route in &config.routes {
        tracing::info!(
            frontend_prefix = %route.frontend_prefix,
            backend_prefix = %route.backend_prefix,
            "Route"
        );
    }
}
