//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Compile configuration into the shared [`GatewayState`]
//! - Create the Axum router with the gateway handler as catch-all
//! - Wire up middleware (request ID, tracing)
//! - Serve until the shutdown signal fires, draining in-flight requests

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::handler::{gateway_handler, GatewayState};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::lifecycle::{shutdown, StartupError};
use crate::passthrough::Passthrough;
use crate::proxy::{BackendTarget, Forwarder};
use crate::routing::{RouteTable, StreamingPredicate};
use crate::security::CorsPolicy;

/// HTTP server for the edge gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Create a new server from a validated configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, StartupError> {
        let state = Self::build_state(&config)?;
        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    fn build_state(config: &GatewayConfig) -> Result<GatewayState, StartupError> {
        let target = BackendTarget::parse(&config.backend.base_url)?;
        let forwarder = Forwarder::new(target, &config.timeouts)?;

        Ok(GatewayState {
            routes: Arc::new(RouteTable::from_config(config.routes.clone())),
            cors: Arc::new(CorsPolicy::from_config(&config.cors)?),
            streaming: Arc::new(StreamingPredicate::from_config(config.streaming.clone())),
            forwarder,
            passthrough: Passthrough::from_config(&config.passthrough),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: GatewayState) -> Router {
        Router::new()
            .fallback(gateway_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown_rx` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backend = %self.config.backend.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
