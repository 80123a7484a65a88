//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming path
//!     → router.rs (ordered table scan)
//!     → matcher.rs (prefix test & rewrite)
//!     → Return: RouteMatch { rewritten_path } or None (passthrough)
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → RouteEntry[] in declaration order
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (declaration order)

pub mod matcher;
pub mod router;
pub mod streaming;

pub use matcher::RouteEntry;
pub use router::{RouteMatch, RouteTable};
pub use streaming::StreamingPredicate;
