//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, BACKEND_URL / ALLOWED_ORIGIN overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → compiled into RouteTable / CorsPolicy / BackendTarget at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the process reads it exactly once
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BackendConfig;
pub use schema::CorsConfig;
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::RouteConfig;
pub use schema::StreamingConfig;
pub use validation::ValidationError;
