//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::session_service::SessionService`] - Token issuance, verification and rotation
//! - [`services::auth_service::AuthService`] - Registration, login, refresh and logout
//! - [`services::url_service::UrlService`] - Short URL creation and resolution
//! - [`services::todo_service::TodoService`] - Per-user todo items

pub mod services;
