//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID + trace layers)
//!     → handler.rs (OPTIONS → preflight; route lookup)
//!         → matched:   proxy forwarder → response.rs (CORS + streaming overlay)
//!         → unmatched: passthrough     → response.rs (CORS overlay)
//!         → failure:   response.rs (500 JSON + CORS)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::GatewayState;
pub use request::X_REQUEST_ID;
pub use server::GatewayServer;
