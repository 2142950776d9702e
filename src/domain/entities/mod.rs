//! Core domain entities.
//!
//! Entities are plain data structures; behaviour lives in
//! [`crate::application::services`].
//!
//! # Entity Types
//!
//! - [`User`] - An account holding a password hash and the current refresh token
//! - [`ShortUrl`] - A short code mapped to a target URL with an access counter
//! - [`Todo`] - A todo item owned by a user
//!
//! Creation inputs use separate `New*` structs (`NewUser`, `NewShortUrl`,
//! `NewTodo`); partial updates use `TodoPatch`.

pub mod short_url;
pub mod todo;
pub mod user;

pub use short_url::{NewShortUrl, ShortUrl};
pub use todo::{NewTodo, Todo, TodoPatch};
pub use user::{NewUser, User};
