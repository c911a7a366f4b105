//! # Middleware Module
//!
//! Rate limiting for the cutfinder HTTP API.
//!
//! ## Configuration
//!
//! - `CUTFINDER_RATE_LIMIT`: Requests per second (default: 20, 0 disables)

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    Quota, RateLimiter,
    clock::{Clock, DefaultClock},
    state::{InMemoryState, NotKeyed},
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Default rate limit in requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 20;

// =============================================================================
// RATE LIMITER
// =============================================================================

/// One quota shared by every client of the server.
pub type GlobalRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Create the shared limiter; a zero rate is raised to one request per second.
pub fn create_rate_limiter(requests_per_second: u32) -> GlobalRateLimiter {
    let rps = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rps)))
}

/// Read `CUTFINDER_RATE_LIMIT`, falling back to the default when unset or unparsable.
pub fn get_rate_limit_from_env() -> u32 {
    std::env::var("CUTFINDER_RATE_LIMIT")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(DEFAULT_RATE_LIMIT)
}

/// Whole seconds a client should wait, never less than one.
fn retry_after_secs(wait: Duration) -> u64 {
    let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
    secs.max(1)
}

/// Reject requests over the shared quota with 429 and a `Retry-After` hint.
pub async fn rate_limit_middleware(
    State(limiter): State<GlobalRateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match limiter.check() {
        Ok(()) => next.run(request).await,
        Err(not_until) => {
            let retry_after = retry_after_secs(not_until.wait_time_from(limiter.clock().now()));
            tracing::warn!(
                path = %request.uri().path(),
                retry_after,
                "request rejected by rate limit"
            );
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after.to_string())],
                "Too Many Requests",
            )
                .into_response()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rate_limiter() {
        let limiter = create_rate_limiter(2);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }

    #[test]
    fn test_retry_after_rounds_up() {
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
        assert_eq!(retry_after_secs(Duration::from_millis(200)), 1);
        assert_eq!(retry_after_secs(Duration::from_secs(2)), 2);
        assert_eq!(retry_after_secs(Duration::from_millis(2001)), 3);
    }

    #[test]
    fn test_zero_rate_allows_one_request() {
        let limiter = create_rate_limiter(0);
        assert!(limiter.check().is_ok());
        assert!(limiter.check().is_err());
    }
}
