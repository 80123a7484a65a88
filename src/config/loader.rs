//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `backend.base_url`.
pub const BACKEND_URL_ENV: &str = "BACKEND_URL";

/// Environment variable overriding `cors.allowed_origin`.
pub const ALLOWED_ORIGIN_ENV: &str = "ALLOWED_ORIGIN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply process environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => GatewayConfig::default(),
    };

    finalize(config, |key| std::env::var(key).ok())
}

/// Parse TOML text without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply overrides from `lookup` and validate.
///
/// `lookup` stands in for the process environment so the resolution
/// happens exactly once, at load time.
pub fn finalize<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
        tracing::debug!(base_url = %url, "backend.base_url overridden from environment");
        config.backend.base_url = url.trim().to_string();
    }

    if let Some(origin) = lookup(ALLOWED_ORIGIN_ENV).filter(|v| !v.trim().is_empty()) {
        tracing::debug!(origin = %origin, "cors.allowed_origin overridden from environment");
        config.cors.allowed_origin = origin.trim().to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
