//! Edge gateway between a browser frontend and a streaming API backend.
//!
//! Answers CORS preflights, rewrites frontend paths to backend paths by
//! prefix, forwards requests to one backend origin and keeps
//! Server-Sent-Events responses unbuffered on the way back.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod passthrough;
pub mod proxy;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
