//! DTOs for registration, login and token refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{IssuedToken, TokenPair};
use crate::domain::entities::User;

/// Request body for `POST /api/auth/register`.
///
/// Missing fields deserialize as empty strings so the service can answer
/// with a single "All fields are required" message.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: String,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(max = 254, message = "Email is too long"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(max = 128, message = "Password is too long"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Access token handed to the client. The refresh token travels in a cookie.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until the access token expires.
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

impl From<&IssuedToken> for TokenResponse {
    fn from(access: &IssuedToken) -> Self {
        Self {
            access_token: access.token.clone(),
            token_type: "Bearer",
            expires_in: (access.expires_at - Utc::now()).num_seconds().max(0),
            expires_at: access.expires_at,
        }
    }
}

impl From<&TokenPair> for TokenResponse {
    fn from(pair: &TokenPair) -> Self {
        Self::from(&pair.access)
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    #[serde(flatten)]
    pub token: TokenResponse,
}
