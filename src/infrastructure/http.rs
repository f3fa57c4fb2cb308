//! HTTP publishing surface.
//!
//! One POST route per environment, each bound to one counter. Summaries are
//! serialized straight from [`WindowedCounter::summary`]; the non-public
//! routes require HTTP Basic credentials and every response carries
//! permissive CORS headers so browser dashboards can poll from anywhere.

use crate::application::counter::WindowedCounter;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Credentials required by the authenticated summary routes.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Expected Basic-auth username
    pub username: String,
    /// Expected Basic-auth password
    pub password: String,
}

/// Shared state for the summary routes.
#[derive(Debug)]
pub struct PublishState {
    /// Counter behind `/staging`
    pub staging: Arc<WindowedCounter>,
    /// Counter behind `/prod`
    pub prod: Arc<WindowedCounter>,
    /// Counter behind `/public`
    pub public: Arc<WindowedCounter>,
    /// Credentials for the authenticated routes
    pub credentials: Credentials,
}

/// Build the summary router.
pub fn router(state: Arc<PublishState>) -> Router {
    Router::new()
        .route("/staging", post(staging_summary).options(preflight))
        .route("/prod", post(prod_summary).options(preflight))
        .route("/public", post(public_summary).options(preflight))
        .with_state(state)
}

/// Serve the router on an already-bound listener.
pub async fn serve(listener: TcpListener, state: Arc<PublishState>) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "summary server listening");
    }
    axum::serve(listener, router(state)).await
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET,POST,OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type,Authorization"),
    );
    headers.insert(header::ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("3600"));
    headers
}

/// Check an `Authorization: Basic` header against the configured
/// credentials.
fn is_authorized(headers: &HeaderMap, credentials: &Credentials) -> bool {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return false;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let Some(encoded) = value.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = general_purpose::STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(text) = String::from_utf8(decoded) else {
        return false;
    };

    text == format!("{}:{}", credentials.username, credentials.password)
}

fn unauthorized() -> Response {
    let mut headers = cors_headers();
    headers.insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"User Visible Realm\", charset=\"UTF-8\""),
    );
    (StatusCode::UNAUTHORIZED, headers).into_response()
}

fn summary_response(counter: &WindowedCounter) -> Response {
    (cors_headers(), Json(counter.summary())).into_response()
}

async fn preflight() -> Response {
    (StatusCode::OK, cors_headers()).into_response()
}

async fn staging_summary(State(state): State<Arc<PublishState>>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers, &state.credentials) {
        return unauthorized();
    }
    summary_response(&state.staging)
}

async fn prod_summary(State(state): State<Arc<PublishState>>, headers: HeaderMap) -> Response {
    if !is_authorized(&headers, &state.credentials) {
        return unauthorized();
    }
    summary_response(&state.prod)
}

/// The public route is intentionally unauthenticated; the counter behind it
/// runs a redacting policy, so nothing sensitive is exposed.
async fn public_summary(State(state): State<Arc<PublishState>>) -> Response {
    summary_response(&state.public)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            username: "observer".to_string(),
            password: "hunter2".to_string(),
        }
    }

    fn basic_header(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!(
                "Basic {}",
                general_purpose::STANDARD.encode(raw)
            ))
            .unwrap(),
        );
        headers
    }

    #[test]
    fn test_authorized_with_matching_credentials() {
        assert!(is_authorized(
            &basic_header("observer:hunter2"),
            &credentials()
        ));
    }

    #[test]
    fn test_rejects_wrong_password() {
        assert!(!is_authorized(
            &basic_header("observer:wrong"),
            &credentials()
        ));
    }

    #[test]
    fn test_rejects_missing_header() {
        assert!(!is_authorized(&HeaderMap::new(), &credentials()));
    }

    #[test]
    fn test_rejects_non_basic_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer sometoken"),
        );
        assert!(!is_authorized(&headers, &credentials()));
    }

    #[test]
    fn test_rejects_invalid_base64() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic !!!not-base64!!!"),
        );
        assert!(!is_authorized(&headers, &credentials()));
    }

    #[test]
    fn test_cors_headers_present() {
        let headers = cors_headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET,POST,OPTIONS");
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type,Authorization"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_MAX_AGE], "3600");
    }
}
