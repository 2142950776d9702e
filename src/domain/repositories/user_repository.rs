//! Repository trait for user accounts and refresh token storage.

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// Besides plain lookups, owns the single refresh token slot of each user.
/// Refresh tokens are passed in already fingerprinted; raw tokens never
/// reach storage.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryUserRepository`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by id.
    ///
    /// Must read the most recent committed state; refresh token verification
    /// depends on it.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Finds a user by (normalized) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists all users, oldest first.
    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Unconditionally replaces the stored refresh token fingerprint.
    ///
    /// `None` clears it (logout).
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the user exists and was updated
    /// - `Ok(false)` if no such user exists
    async fn replace_refresh_token(
        &self,
        id: i64,
        token_hash: Option<String>,
    ) -> Result<bool, AppError>;

    /// Atomically replaces the stored fingerprint only if it still equals
    /// `expected`.
    ///
    /// # Returns
    ///
    /// - `Ok(true)` if the swap happened
    /// - `Ok(false)` if the stored value differed or the user is gone
    async fn swap_refresh_token(
        &self,
        id: i64,
        expected: &str,
        replacement: &str,
    ) -> Result<bool, AppError>;
}
