//! Account registration, login, refresh and logout.

use std::sync::Arc;

use serde_json::json;
use validator::ValidateEmail;

use crate::application::services::session_service::{SessionService, TokenPair};
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password::{hash_password, verify_password};

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 20;

/// Trims and lowercases an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::bad_request("Invalid email or password", json!({}))
}

fn user_exists() -> AppError {
    AppError::bad_request("User already exists", json!({}))
}

/// Service for account lifecycle on top of the [`SessionService`].
///
/// Passwords are stored as Argon2id hashes. Hashing and verification run on
/// the blocking thread pool.
pub struct AuthService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    sessions: Arc<SessionService<R>>,
    password_min_length: usize,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(
        repository: Arc<R>,
        sessions: Arc<SessionService<R>>,
        password_min_length: usize,
    ) -> Self {
        Self {
            repository,
            sessions,
            password_min_length,
        }
    }

    /// Registers a new account and starts its first session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - any field is empty after trimming
    /// - the name is not 3 to 20 characters long
    /// - the email is malformed
    /// - the password is shorter than the configured minimum
    /// - the email is already registered
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, TokenPair), AppError> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::bad_request("All fields are required", json!({})));
        }

        let name_length = name.chars().count();
        if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&name_length) {
            return Err(AppError::bad_request(
                format!(
                    "Name must be between {} and {} characters",
                    NAME_MIN_LENGTH, NAME_MAX_LENGTH
                ),
                json!({ "field": "name" }),
            ));
        }

        if !email.validate_email() {
            return Err(AppError::bad_request(
                "Invalid email format",
                json!({ "field": "email" }),
            ));
        }

        if password.chars().count() < self.password_min_length {
            return Err(AppError::bad_request(
                format!(
                    "Password must be at least {} characters",
                    self.password_min_length
                ),
                json!({ "field": "password" }),
            ));
        }

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(user_exists());
        }

        let password = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing task failed");
                AppError::internal("Password hashing failed", json!({}))
            })??;

        let user = self
            .repository
            .create(NewUser {
                name: name.to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // Lost a race with a concurrent registration.
                AppError::Conflict { .. } => user_exists(),
                other => other,
            })?;

        let tokens = self.sessions.start_session(user.id).await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok((user, tokens))
    }

    /// Checks credentials and starts a new session, superseding any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] with the same message whether the
    /// email is unknown or the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let email = normalize_email(email);

        if email.is_empty() || password.is_empty() {
            return Err(AppError::bad_request("All fields are required", json!({})));
        }

        let Some(user) = self.repository.find_by_email(&email).await? else {
            return Err(invalid_credentials());
        };

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Password verification task failed");
                    AppError::internal("Password verification failed", json!({}))
                })??;

        if !matches {
            tracing::info!(user_id = user.id, "Login rejected");
            return Err(invalid_credentials());
        }

        let tokens = self.sessions.start_session(user.id).await?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(tokens)
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is missing or no
    /// longer current.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<TokenPair, AppError> {
        let token = refresh_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Unauthorized", json!({})))?;

        // A deleted account reads the same as any other dead token.
        self.sessions
            .exchange_refresh_token(token)
            .await
            .map_err(|e| match e {
                AppError::NotFound { .. } => AppError::unauthorized("Unauthorized", json!({})),
                other => other,
            })
    }

    /// Ends the user's session by clearing the stored refresh token.
    pub async fn logout(&self, user_id: i64) -> Result<(), AppError> {
        self.sessions.revoke_refresh_token(user_id).await
    }

    /// Loads the account behind an authenticated request.
    pub async fn current_user(&self, user_id: i64) -> Result<User, AppError> {
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({})))
    }
}
