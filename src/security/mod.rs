//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (OPTIONS short-circuit)
//!     → headers.rs (drop hop-by-hop before forwarding)
//!
//! Outgoing response:
//!     → headers.rs (drop hop-by-hop from backend response)
//!     → cors.rs (overlay policy headers)
//! ```
//!
//! # Design Decisions
//! - One policy for API, static and error responses alike
//! - No authentication here: credentials pass through untouched

pub mod cors;
pub mod headers;

pub use cors::CorsPolicy;
