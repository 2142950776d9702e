//! Helpers shared across services.
//!
//! - [`code_generator`] - Collision-checked short code generation
//! - [`password`] - Argon2id password hashing
//! - [`url_validator`] - Target URL validation for the shortener

pub mod code_generator;
pub mod password;
pub mod url_validator;
