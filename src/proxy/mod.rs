//! Forwarding proxy subsystem.
//!
//! # Data Flow
//! ```text
//! rewritten path + original request
//!     → target.rs (base URL + path + original query)
//!     → forwarder.rs (mirror method/headers/body, follow redirects)
//!     → reqwest::Response (streaming body) or UpstreamError
//! ```

pub mod error;
pub mod forwarder;
pub mod target;

pub use error::UpstreamError;
pub use forwarder::Forwarder;
pub use target::BackendTarget;
