//! Access and refresh token issuance, verification and rotation.
//!
//! Access tokens are stateless HS256 JWTs: they are verified by signature and
//! expiry only and cannot be revoked before they expire. Refresh tokens are
//! HS256 JWTs signed with a separate key whose HMAC-SHA256 fingerprint is kept
//! on the user record. A refresh token is accepted only while its fingerprint
//! is the one stored, so issuing a new refresh token silently supersedes the
//! previous one (single active session per user).
//!
//! # Session lifecycle
//!
//! ```text
//! Anonymous --login/register--> Authenticated --refresh--> Authenticated'
//!     ^                                                         |
//!     +--------------------------logout-------------------------+
//! ```
//!
//! Logout clears the stored fingerprint. Access tokens issued before logout
//! stay valid until their natural expiry; the staleness window is bounded by
//! the access token lifetime.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::Sha256;
use uuid::Uuid;

use crate::domain::repositories::UserRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Which of the two token families a JWT belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT payload shared by both token kinds.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: i64,
    iat: i64,
    exp: i64,
    /// Random per-token id; two tokens minted in the same second still differ.
    jti: String,
    typ: TokenKind,
}

/// Signing keys and lifetimes, injected at construction.
#[derive(Clone)]
pub struct SessionConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("access_secret", &"***")
            .field("refresh_secret", &"***")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Access token plus the refresh token that now occupies the user's slot.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// Credential and session manager.
///
/// Issuance and access token verification are pure. Refresh token
/// verification reads the user record, and rotation writes it through
/// [`UserRepository::replace_refresh_token`] or the atomic
/// [`UserRepository::swap_refresh_token`].
pub struct SessionService<R: UserRepository + ?Sized> {
    repository: Arc<R>,
    access: SigningKeys,
    refresh: SigningKeys,
    fingerprint_key: Vec<u8>,
    validation: Validation,
}

/// The single failure callers see for any rejected token.
fn unauthenticated() -> AppError {
    AppError::unauthorized("Unauthorized", json!({}))
}

impl<R: UserRepository + ?Sized> SessionService<R> {
    /// Creates the session manager.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if a signing key is empty or a lifetime
    /// is not positive. Both are fatal configuration errors.
    pub fn new(repository: Arc<R>, config: SessionConfig) -> Result<Self, AppError> {
        if config.access_secret.is_empty() || config.refresh_secret.is_empty() {
            return Err(AppError::internal(
                "Signing key is not configured",
                json!({}),
            ));
        }

        if config.access_ttl <= Duration::zero() || config.refresh_ttl <= Duration::zero() {
            return Err(AppError::internal(
                "Token lifetimes must be positive",
                json!({}),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Ok(Self {
            repository,
            access: SigningKeys::new(&config.access_secret, config.access_ttl),
            refresh: SigningKeys::new(&config.refresh_secret, config.refresh_ttl),
            fingerprint_key: config.refresh_secret.into_bytes(),
            validation,
        })
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Signs a token of `kind` as if issued at `issued_at`.
    pub(crate) fn issue_at(
        &self,
        kind: TokenKind,
        user_id: i64,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let keys = self.keys(kind);
        let expires_at = issued_at.checked_add_signed(keys.ttl).ok_or_else(|| {
            tracing::error!(?kind, ttl = %keys.ttl, "Token expiry out of range");
            AppError::internal("Token expiry out of range", json!({}))
        })?;

        let claims = Claims {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            typ: kind,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(|e| {
            tracing::error!(error = %e, ?kind, "Token signing failed");
            AppError::internal("Token signing failed", json!({}))
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Decodes and checks signature, expiry and kind.
    fn decode_claims(&self, kind: TokenKind, token: &str) -> Result<Claims, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(unauthenticated());
        }

        let data = decode::<Claims>(token, &self.keys(kind).decoding, &self.validation).map_err(
            |e| {
                tracing::debug!(error = %e, ?kind, "Token rejected");
                unauthenticated()
            },
        )?;

        if data.claims.typ != kind {
            tracing::debug!(?kind, actual = ?data.claims.typ, "Token kind mismatch");
            return Err(unauthenticated());
        }

        Ok(data.claims)
    }

    /// Keyed fingerprint stored in place of the raw refresh token.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn fingerprint(&self, token: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.fingerprint_key).expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Issues an access token expiring after the configured access lifetime.
    pub fn issue_access_token(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        self.issue_at(TokenKind::Access, user_id, Utc::now())
    }

    /// Issues a refresh token without persisting it.
    ///
    /// The caller must store it on the user record for it to become usable;
    /// see [`Self::rotate_refresh_token`].
    pub fn issue_refresh_token(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        self.issue_at(TokenKind::Refresh, user_id, Utc::now())
    }

    /// Verifies an access token and returns the embedded user id.
    ///
    /// Does not consult storage.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is missing, malformed,
    /// expired, signed with another key or is a refresh token.
    pub fn verify_access_token(&self, token: &str) -> Result<i64, AppError> {
        self.decode_claims(TokenKind::Access, token)
            .map(|claims| claims.sub)
    }

    /// Verifies a refresh token against the user's stored value.
    ///
    /// # Errors
    ///
    /// - [`AppError::Unauthorized`] if signature, expiry or kind checks fail,
    ///   or the token is not the one currently stored (superseded or logged
    ///   out). The two cases are not distinguished.
    /// - [`AppError::NotFound`] if the user no longer exists.
    pub async fn verify_refresh_token(&self, token: &str) -> Result<i64, AppError> {
        let claims = self.decode_claims(TokenKind::Refresh, token)?;

        let user = self
            .repository
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;

        let presented = self.fingerprint(token.trim());
        if user.refresh_token_hash.as_deref() != Some(presented.as_str()) {
            tracing::info!(user_id = user.id, "Refresh token is not the current one");
            return Err(unauthenticated());
        }

        Ok(user.id)
    }

    /// Issues a refresh token and stores it, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn rotate_refresh_token(&self, user_id: i64) -> Result<IssuedToken, AppError> {
        let issued = self.issue_refresh_token(user_id)?;

        let stored = self
            .repository
            .replace_refresh_token(user_id, Some(self.fingerprint(&issued.token)))
            .await?;

        if !stored {
            return Err(AppError::not_found(
                "User not found",
                json!({ "user_id": user_id }),
            ));
        }

        tracing::debug!(user_id, "Refresh token rotated");
        Ok(issued)
    }

    /// Starts a new session: rotates the refresh token and issues an access token.
    pub async fn start_session(&self, user_id: i64) -> Result<TokenPair, AppError> {
        let refresh = self.rotate_refresh_token(user_id).await?;
        let access = self.issue_access_token(user_id)?;

        Ok(TokenPair { access, refresh })
    }

    /// Trades a valid refresh token for a new access token and a new refresh
    /// token, invalidating the presented one.
    ///
    /// The swap is a compare-and-swap on the stored fingerprint, so of two
    /// concurrent exchanges of the same token at most one succeeds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify_refresh_token`]; losing the swap race is also
    /// reported as [`AppError::Unauthorized`].
    pub async fn exchange_refresh_token(&self, token: &str) -> Result<TokenPair, AppError> {
        let token = token.trim();
        let user_id = self.verify_refresh_token(token).await?;

        let refresh = self.issue_refresh_token(user_id)?;
        let swapped = self
            .repository
            .swap_refresh_token(
                user_id,
                &self.fingerprint(token),
                &self.fingerprint(&refresh.token),
            )
            .await?;

        if !swapped {
            tracing::warn!(user_id, "Refresh token superseded during exchange");
            return Err(unauthenticated());
        }

        let access = self.issue_access_token(user_id)?;
        tracing::debug!(user_id, "Refresh token exchanged");

        Ok(TokenPair { access, refresh })
    }

    /// Clears the stored refresh token (logout).
    ///
    /// Outstanding access tokens are not affected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    pub async fn revoke_refresh_token(&self, user_id: i64) -> Result<(), AppError> {
        let cleared = self
            .repository
            .replace_refresh_token(user_id, None)
            .await?;

        if !cleared {
            return Err(AppError::not_found(
                "User not found",
                json!({ "user_id": user_id }),
            ));
        }

        tracing::info!(user_id, "Refresh token revoked");
        Ok(())
    }
}
