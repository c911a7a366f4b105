//! # Authentication Module
//!
//! Bearer-key authentication for the cutfinder HTTP API.
//!
//! `CUTFINDER_API_KEY` is read once when the router is built. When it is set,
//! every route except `/health` needs
//!
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Routes reachable without a key.
const PUBLIC_PATHS: &[&str] = &["/health"];

// =============================================================================
// API KEY AUTHENTICATION
// =============================================================================

/// The configured key, shared by all requests.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    /// Whether `provided` is this key, compared in constant time.
    #[must_use]
    pub fn accepts(&self, provided: &str) -> bool {
        keys_match(provided, &self.0)
    }
}

/// Get the API key from `CUTFINDER_API_KEY`; `None` when unset or empty.
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("CUTFINDER_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// Compare two keys in constant time.
///
/// Both keys are zero-padded to a common length so the comparison always
/// covers the same number of bytes; lengths are checked separately.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let len = provided.len().max(expected.len());
    let mut lhs = vec![0u8; len];
    let mut rhs = vec![0u8; len];
    lhs[..provided.len()].copy_from_slice(provided);
    rhs[..expected.len()].copy_from_slice(expected);

    let bytes_match: bool = lhs.ct_eq(&rhs).into();
    bytes_match && provided.len() == expected.len()
}

/// Key carried by an `Authorization` header; the `Bearer ` prefix is optional.
fn presented_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.strip_prefix("Bearer ").unwrap_or(v))
}

/// Reject requests to non-public routes that lack the configured key.
pub async fn api_key_auth_middleware(
    State(key): State<ApiKey>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    if PUBLIC_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let reason = match presented_key(&request) {
        Some(provided) if key.accepts(provided) => return Ok(next.run(request).await),
        Some(_) => "invalid_api_key",
        None => "missing_authorization_header",
    };
    tracing::warn!(
        path = %request.uri().path(),
        reason,
        "request rejected by api key check"
    );
    Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
}

// =============================================================================
// TESTS
// =============================================================================
