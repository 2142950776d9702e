//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod redirect;
pub mod short_url;
pub mod todos;

pub use auth::{
    login_handler, logout_handler, me_handler, refresh_token_handler, register_handler,
};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use short_url::{
    delete_short_url_handler, get_short_url_handler, short_url_stats_handler, shorten_handler,
    update_short_url_handler,
};
pub use todos::{create_todo_handler, delete_todo_handler, list_todos_handler, update_todo_handler};
