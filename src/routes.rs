//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`         - Short URL redirect (public)
//! - `GET  /health`         - Storage health check (public)
//! - `/api/auth/*`          - Register, login, refresh (public, strict rate limit)
//! - `/api/shorten/*`       - Short URL management (public)
//! - `/api/todos/*`, `/api/auth/logout`, `/api/auth/me` - Bearer token required
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket
//! - **Authentication** - Access token verification
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

fn build_router(state: AppState, rate_limited: bool) -> Router {
    let mut auth_router = api::routes::auth_routes();
    let mut protected_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
    let mut public_router = api::routes::public_routes();

    if rate_limited {
        auth_router = auth_router.layer(rate_limit::secure_layer());
        protected_router = protected_router.layer(rate_limit::layer());
        public_router = public_router.layer(rate_limit::layer());
    }

    let api_router = Router::new()
        .merge(auth_router)
        .merge(protected_router)
        .merge(public_router);

    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the peer address, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, true))
}

/// Same routes as [`app_router`] without rate limiting or path
/// normalization.
///
/// Needs no connection info, which makes it usable from in-process test
/// clients.
pub fn router(state: AppState) -> Router {
    build_router(state, false)
}
