//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject CORS policies browsers will refuse (credentials with wildcard origin)
//! - Check that prefixes, URLs and addresses are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener address '{0}'")]
    ListenerAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("backend base_url '{url}' is invalid: {reason}")]
    BackendUrl { url: String, reason: String },

    #[error("route #{index} has an empty frontend_prefix")]
    EmptyPrefix { index: usize },

    #[error("route prefix '{0}' must start with '/'")]
    RelativePrefix(String),

    #[error("frontend_prefix '{0}' is declared more than once")]
    DuplicatePrefix(String),

    #[error("allow_credentials requires a concrete allowed_origin, not '*'")]
    CredentialsWithWildcard,

    #[error("allowed_origin '{0}' is not a valid origin")]
    InvalidOrigin(String),

    #[error("'{0}' is not a valid HTTP method")]
    InvalidMethod(String),

    #[error("'{0}' is not a valid header name")]
    InvalidHeader(String),

    #[error("streaming rules must not contain empty entries")]
    EmptyStreamingRule,
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::ListenerAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    validate_backend(&config.backend.base_url, &mut errors);
    validate_routes(config, &mut errors);
    validate_cors(config, &mut errors);

    let streaming = &config.streaming;
    if streaming
        .prefixes
        .iter()
        .chain(streaming.substrings.iter())
        .any(String::is_empty)
    {
        errors.push(ValidationError::EmptyStreamingRule);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_backend(base_url: &str, errors: &mut Vec<ValidationError>) {
    let invalid = |reason: String| ValidationError::BackendUrl {
        url: base_url.to_string(),
        reason,
    };

    match Url::parse(base_url) {
        Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
            errors.push(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        Ok(url) if url.host_str().is_none() => {
            errors.push(invalid("missing host".to_string()));
        }
        Ok(url) if url.query().is_some() || url.fragment().is_some() => {
            errors.push(invalid("must not carry a query or fragment".to_string()));
        }
        Ok(_) => {}
        Err(e) => errors.push(invalid(e.to_string())),
    }
}

fn validate_routes(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();

    for (index, route) in config.routes.iter().enumerate() {
        if route.frontend_prefix.is_empty() {
            errors.push(ValidationError::EmptyPrefix { index });
            continue;
        }
        if !route.frontend_prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix(route.frontend_prefix.clone()));
        }
        // An empty backend prefix strips the frontend prefix entirely.
        if !route.backend_prefix.is_empty() && !route.backend_prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix(route.backend_prefix.clone()));
        }
        if !seen.insert(route.frontend_prefix.as_str()) {
            errors.push(ValidationError::DuplicatePrefix(route.frontend_prefix.clone()));
        }
    }
}

fn validate_cors(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    let cors = &config.cors;

    if cors.allowed_origin == "*" {
        if cors.allow_credentials {
            errors.push(ValidationError::CredentialsWithWildcard);
        }
    } else if !is_origin(&cors.allowed_origin) {
        errors.push(ValidationError::InvalidOrigin(cors.allowed_origin.clone()));
    }

    for method in &cors.allowed_methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }

    for header in &cors.allowed_headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeader(header.clone()));
        }
    }
}

/// An origin is `scheme://host[:port]` with nothing after it.
fn is_origin(value: &str) -> bool {
    if HeaderValue::from_str(value).is_err() {
        return false;
    }
    match Url::parse(value) {
        Ok(url) => {
            url.host_str().is_some()
                && url.path() == "/"
                && !value.ends_with('/')
                && url.query().is_none()
                && url.fragment().is_none()
        }
        Err(_) => false,
    }
}
