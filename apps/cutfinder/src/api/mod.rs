//! # cutfinder HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `POST /cuts` - Search for a cut scheme
//! - `GET /gates` - Standard gate-cut gamma table
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `CUTFINDER_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: the local server address)
//! - `CUTFINDER_RATE_LIMIT`: Requests per second (default: 20, 0 to disable)
//! - `CUTFINDER_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{ApiKey, get_api_key_from_env, keys_match};
pub use handlers::{cuts_handler, gates_handler, health_handler, status_for_error};
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
pub use types::{CutsRequest, CutsResponse, GateInfo, GatesResponse, HealthResponse};

use crate::config::AppConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use cutfinder_core::{CutFinderError, DeviceConstraints, OptimizationSettings};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Request body limit (2 MB).
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// `settings` are the defaults for requests that omit `optimization` and
/// the ceiling for those that send it.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub settings: OptimizationSettings,
    /// Device limits; `None` means every request must send its own.
    pub constraints: Option<DeviceConstraints>,
}

impl AppState {
    #[must_use]
    pub fn new(settings: OptimizationSettings, constraints: Option<DeviceConstraints>) -> Self {
        Self {
            settings,
            constraints,
        }
    }

    /// State carrying the `[optimization]` and `[constraints]` sections.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.optimization, config.constraints)
    }

    /// Settings for one request, with its search bounds capped at the
    /// server's own `max_gamma` and `max_backjumps`.
    #[must_use]
    pub fn request_settings(
        &self,
        requested: Option<OptimizationSettings>,
    ) -> OptimizationSettings {
        let Some(mut settings) = requested else {
            return self.settings;
        };
        let ceiling = &self.settings;
        if settings.max_gamma > ceiling.max_gamma {
            settings.max_gamma = ceiling.max_gamma;
        }
        settings.max_backjumps = match (settings.max_backjumps, ceiling.max_backjumps) {
            (Some(requested), Some(limit)) => Some(requested.min(limit)),
            (None, limit) => limit,
            (requested, None) => requested,
        };
        settings
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(OptimizationSettings::default(), None)
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Browser origins served when `CUTFINDER_CORS_ORIGINS` is unset: the
/// default `server` address under both of its local names.
const LOCAL_ORIGINS: &[&str] = &["http://127.0.0.1:8080", "http://localhost:8080"];

/// Which origins may call the API from a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CorsPolicy {
    Any,
    Origins(Vec<HeaderValue>),
}

impl CorsPolicy {
    /// Interpret a `CUTFINDER_CORS_ORIGINS` value.
    ///
    /// `*` opens the API to every origin; otherwise the value is a comma
    /// list. Unparsable entries are skipped, and an unset or empty list
    /// falls back to [`LOCAL_ORIGINS`].
    fn parse(value: Option<&str>) -> Self {
        let Some(value) = value.map(str::trim) else {
            return Self::local();
        };
        if value == "*" {
            return Self::Any;
        }

        let origins: Vec<HeaderValue> = value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    tracing::warn!(origin, "ignoring unparsable CORS origin");
                    None
                }
            })
            .collect();

        if origins.is_empty() {
            Self::local()
        } else {
            Self::Origins(origins)
        }
    }

    fn local() -> Self {
        Self::Origins(
            LOCAL_ORIGINS
                .iter()
                .map(|&origin| HeaderValue::from_static(origin))
                .collect(),
        )
    }

    fn into_layer(self) -> CorsLayer {
        match self {
            Self::Any => {
                tracing::warn!("CORS open to every origin");
                CorsLayer::permissive()
            }
            Self::Origins(origins) => {
                tracing::info!(origins = ?origins, "CORS restricted");
                CorsLayer::new()
                    .allow_origin(origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = CorsPolicy::parse(std::env::var("CUTFINDER_CORS_ORIGINS").ok().as_deref())
        .into_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let api_key = get_api_key_from_env().map(|key| ApiKey::new(&key));
    if api_key.is_some() {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!("API key authentication disabled; set CUTFINDER_API_KEY to require one");
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/gates", get(handlers::gates_handler))
        .route("/cuts", post(handlers::cuts_handler));

    if let Some(key) = api_key {
        router = router.layer(axum_middleware::from_fn_with_state(
            key,
            auth::api_key_auth_middleware,
        ));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until Ctrl+C.
pub async fn run_server(addr: &str, state: AppState) -> Result<(), CutFinderError> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CutFinderError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("cutfinder HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CutFinderError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

// =============================================================================
// TESTS
// =============================================================================
