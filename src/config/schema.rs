//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend origin all rewritten requests resolve against.
    pub backend: BackendConfig,

    /// Upstream timeouts.
    pub timeouts: TimeoutConfig,

    /// Cross-origin policy applied to every response.
    pub cors: CorsConfig,

    /// Prefix routes, scanned in declaration order.
    pub routes: Vec<RouteConfig>,

    /// Paths whose responses must stay unbuffered.
    pub streaming: StreamingConfig,

    /// Handling of requests that match no route.
    pub passthrough: PassthroughConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Backend origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the backend API (e.g., "http://localhost:8000").
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the backend to send its response head, in seconds.
    /// Zero disables the limit. Streamed bodies are never cut by this.
    pub upstream_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 60,
        }
    }
}

/// CORS policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// A single concrete origin, or "*".
    pub allowed_origin: String,

    /// Whether `Access-Control-Allow-Credentials: true` is sent.
    pub allow_credentials: bool,

    pub allowed_methods: Vec<String>,

    pub allowed_headers: Vec<String>,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
            allow_credentials: false,
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_headers: ["Content-Type", "Authorization"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_age_secs: 86_400,
        }
    }
}

/// Route configuration mapping a frontend prefix to a backend prefix.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Prefix the browser-facing path must start with.
    pub frontend_prefix: String,

    /// Replacement prefix on the backend side.
    pub backend_prefix: String,
}

impl RouteConfig {
    pub fn new(frontend_prefix: impl Into<String>, backend_prefix: impl Into<String>) -> Self {
        Self {
            frontend_prefix: frontend_prefix.into(),
            backend_prefix: backend_prefix.into(),
        }
    }
}

/// Streaming endpoint detection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Paths starting with any of these are streaming endpoints.
    pub prefixes: Vec<String>,

    /// Paths containing any of these are streaming endpoints.
    pub substrings: Vec<String>,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            prefixes: vec![
                "/api/chat".to_string(),
                "/api/react-search-streaming".to_string(),
            ],
            substrings: Vec::new(),
        }
    }
}

/// Passthrough (non-API) handling.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PassthroughConfig {
    /// Directory of static assets served for unmatched paths.
    /// When unset, unmatched paths answer 404.
    pub static_dir: Option<String>,

    /// Serve `index.html` for unknown paths under `static_dir`.
    pub spa_fallback: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
