//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries against the schema in `migrations/`.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts and refresh token slots
//! - [`PgShortUrlRepository`] - Short URLs and access counters
//! - [`PgTodoRepository`] - Todo items

pub mod pg_short_url_repository;
pub mod pg_todo_repository;
pub mod pg_user_repository;

pub use pg_short_url_repository::PgShortUrlRepository;
pub use pg_todo_repository::PgTodoRepository;
pub use pg_user_repository::PgUserRepository;
