//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence` (PostgreSQL) and
//! `crate::infrastructure::memory` (in-process). Mock implementations are
//! generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts and the per-user refresh token slot
//! - [`ShortUrlRepository`] - Short code records and access counters
//! - [`TodoRepository`] - Todo items owned by users
//!
//! # Atomicity
//!
//! Implementations must make [`UserRepository::swap_refresh_token`],
//! [`ShortUrlRepository::increment_access_count`] and the uniqueness checks
//! in `create` atomic. Services rely on them as the final backstop against
//! concurrent requests.

pub mod short_url_repository;
pub mod todo_repository;
pub mod user_repository;

pub use short_url_repository::ShortUrlRepository;
pub use todo_repository::TodoRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use short_url_repository::MockShortUrlRepository;
#[cfg(test)]
pub use todo_repository::MockTodoRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
