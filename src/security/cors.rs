//! Cross-origin policy.
//!
//! # Responsibilities
//! - Answer preflight requests without touching the backend
//! - Overlay `Access-Control-Allow-Origin` / `-Credentials` on every response
//!
//! # Design Decisions
//! - Header values are rendered once at startup
//! - The request `Origin` header is never reflected; the configured value is
//!   always sent as-is ("*" included)
//! - Backend-sent CORS headers are replaced, never merged

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, Response, StatusCode};

use crate::config::{CorsConfig, ValidationError};

/// Compiled CORS policy.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: HeaderValue,
    allow_credentials: bool,
    allowed_methods: HeaderValue,
    allowed_headers: HeaderValue,
    max_age: HeaderValue,
}

impl CorsPolicy {
    /// Compile a validated [`CorsConfig`].
    ///
    /// The wildcard/credentials check is repeated here so a policy can never
    /// be built in a state browsers reject.
    pub fn from_config(config: &CorsConfig) -> Result<Self, ValidationError> {
        if config.allow_credentials && config.allowed_origin == "*" {
            return Err(ValidationError::CredentialsWithWildcard);
        }

        let allowed_origin = HeaderValue::from_str(&config.allowed_origin)
            .map_err(|_| ValidationError::InvalidOrigin(config.allowed_origin.clone()))?;
        let allowed_methods = join(&config.allowed_methods)
            .map_err(|_| ValidationError::InvalidMethod(config.allowed_methods.join(", ")))?;
        let allowed_headers = join(&config.allowed_headers)
            .map_err(|_| ValidationError::InvalidHeader(config.allowed_headers.join(", ")))?;

        Ok(Self {
            allowed_origin,
            allow_credentials: config.allow_credentials,
            allowed_methods,
            allowed_headers,
            max_age: HeaderValue::from(config.max_age_secs),
        })
    }

    pub fn allowed_origin(&self) -> &HeaderValue {
        &self.allowed_origin
    }

    pub fn allow_credentials(&self) -> bool {
        self.allow_credentials
    }

    /// Build the response to an `OPTIONS` request: 200, empty body, full
    /// preflight header set.
    pub fn preflight_response(&self) -> Response<Body> {
        let mut headers = HeaderMap::new();
        self.overlay(&mut headers);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            self.allowed_methods.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            self.allowed_headers.clone(),
        );
        headers.insert(header::ACCESS_CONTROL_MAX_AGE, self.max_age.clone());

        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;
        *response.headers_mut() = headers;
        response
    }

    /// Overlay the per-response CORS headers, replacing any existing values.
    pub fn overlay(&self, headers: &mut HeaderMap) {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            self.allowed_origin.clone(),
        );
        if self.allow_credentials {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        } else {
            headers.remove(header::ACCESS_CONTROL_ALLOW_CREDENTIALS);
        }
    }
}

fn join(values: &[String]) -> Result<HeaderValue, header::InvalidHeaderValue> {
    HeaderValue::from_str(&values.join(", "))
}
