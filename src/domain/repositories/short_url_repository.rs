//! Repository trait for short URL records.

use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short URL records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryShortUrlRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_short_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    /// Inserts a new record with `access_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken. This is
    /// the storage-level uniqueness guarantee; callers must not rely on a
    /// prior [`Self::code_exists`] check alone.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError>;

    /// Returns whether a record with this code exists.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Finds a record by code without touching its counter.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Atomically adds `delta` to the access counter and returns the updated
    /// record, or `None` if the code is unknown.
    async fn increment_access_count(
        &self,
        code: &str,
        delta: i64,
    ) -> Result<Option<ShortUrl>, AppError>;

    /// Replaces the target URL, or returns `None` if the code is unknown.
    async fn update_url(&self, code: &str, url: &str) -> Result<Option<ShortUrl>, AppError>;

    /// Deletes a record. Returns `Ok(false)` if the code is unknown.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Counts all records.
    async fn count(&self) -> Result<i64, AppError>;
}
