//! Business logic services for the application layer.

pub mod auth_service;
pub mod session_service;
pub mod todo_service;
pub mod url_service;

pub use auth_service::AuthService;
pub use session_service::{IssuedToken, SessionConfig, SessionService, TokenPair};
pub use todo_service::{TodoPage, TodoService};
pub use url_service::UrlService;
