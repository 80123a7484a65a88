//! Next-stage handler for requests that match no API route.
//!
//! Serves static assets from a configured directory, or answers 404 when
//! none is configured. The result always goes back through the response
//! adapter so it carries the same CORS headers as API responses.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::schema::PassthroughConfig;

/// Non-API content source.
#[derive(Debug, Clone)]
pub enum Passthrough {
    /// Static files; unknown paths get `index.html` (single-page apps).
    Spa(ServeDir<ServeFile>),
    /// Static files; unknown paths get 404.
    Static(ServeDir),
    /// No static content configured.
    NotFound,
}

impl Passthrough {
    pub fn from_config(config: &PassthroughConfig) -> Self {
        match &config.static_dir {
            Some(dir) if config.spa_fallback => {
                let index = Path::new(dir).join("index.html");
                Passthrough::Spa(ServeDir::new(dir).fallback(ServeFile::new(index)))
            }
            Some(dir) => Passthrough::Static(ServeDir::new(dir)),
            None => Passthrough::NotFound,
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Passthrough::Spa(_) => "spa",
            Passthrough::Static(_) => "static",
            Passthrough::NotFound => "not_found",
        }
    }

    /// Produce the next-stage response for `request`.
    pub async fn serve(&self, request: Request<Body>) -> Response<Body> {
        let result = match self {
            Passthrough::Spa(service) => service
                .clone()
                .oneshot(request)
                .await
                .map(|response| response.map(Body::new)),
            Passthrough::Static(service) => service
                .clone()
                .oneshot(request)
                .await
                .map(|response| response.map(Body::new)),
            Passthrough::NotFound => Ok(not_found()),
        };

        match result {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

fn not_found() -> Response<Body> {
    let mut response = Response::new(Body::from("Not Found"));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn get(path: &str) -> Request<Body> {
        Request::get(path).body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_without_static_dir() {
        let passthrough = Passthrough::from_config(&PassthroughConfig::default());
        assert_eq!(passthrough.kind(), "not_found");

        let response = passthrough.serve(get("/about")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("about.html"), "<h1>about</h1>").unwrap();

        let passthrough = Passthrough::from_config(&PassthroughConfig {
            static_dir: Some(dir.path().to_string_lossy().into_owned()),
            spa_fallback: false,
        });

        let response = passthrough.serve(get("/about.html")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>about</h1>");

        let missing = passthrough.serve(get("/missing")).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_spa_fallback_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("index.html"), "app shell").unwrap();

        let passthrough = Passthrough::from_config(&PassthroughConfig {
            static_dir: Some(dir.path().to_string_lossy().into_owned()),
            spa_fallback: true,
        });

        let response = passthrough.serve(get("/settings/profile")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "app shell");
    }
}
