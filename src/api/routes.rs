//! API route configuration.
//!
//! Routes are grouped by how they are protected; [`crate::routes`] applies
//! authentication and rate limiting per group.

use crate::api::handlers::{
    create_todo_handler, delete_short_url_handler, delete_todo_handler, get_short_url_handler,
    list_todos_handler, login_handler, logout_handler, me_handler, refresh_token_handler,
    register_handler, short_url_stats_handler, shorten_handler, update_short_url_handler,
    update_todo_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

/// Credential endpoints. Public, but rate limited strictly.
///
/// # Endpoints
///
/// - `POST     /auth/register`       - Create an account and sign in
/// - `POST     /auth/login`          - Sign in
/// - `GET|POST /auth/refresh-token`  - Exchange the refresh cookie for new tokens
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route(
            "/auth/refresh-token",
            get(refresh_token_handler).post(refresh_token_handler),
        )
}

/// Routes that require a valid access token.
///
/// # Endpoints
///
/// - `POST   /auth/logout`  - Revoke the refresh token
/// - `GET    /auth/me`      - Current account
/// - `GET    /todos`        - List own todos (paginated)
/// - `POST   /todos`        - Create a todo
/// - `PUT    /todos/{id}`   - Replace a todo
/// - `DELETE /todos/{id}`   - Delete a todo
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route("/auth/me", get(me_handler))
        .route("/todos", get(list_todos_handler).post(create_todo_handler))
        .route(
            "/todos/{id}",
            put(update_todo_handler).delete(delete_todo_handler),
        )
}

/// Public short URL endpoints.
///
/// # Endpoints
///
/// - `POST   /shorten`               - Create a short URL
/// - `GET    /shorten/{code}`        - Resolve (counts the access)
/// - `PUT    /shorten/{code}`        - Change the target
/// - `DELETE /shorten/{code}`        - Delete
/// - `GET    /shorten/{code}/stats`  - Record and access count
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route(
            "/shorten/{code}",
            get(get_short_url_handler)
                .put(update_short_url_handler)
                .delete(delete_short_url_handler),
        )
        .route("/shorten/{code}/stats", get(short_url_stats_handler))
}
