//! User entity.

use chrono::{DateTime, Utc};

/// A registered account.
///
/// `refresh_token_hash` holds the fingerprint of the single live refresh
/// token; `None` means the user has no active session.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns true if the user currently holds a refresh token.
    pub fn has_active_session(&self) -> bool {
        self.refresh_token_hash.is_some()
    }
}

/// Input data for creating a new user.
///
/// The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(refresh_token_hash: Option<&str>) -> User {
        User {
            id: 1,
            name: "Ann".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            refresh_token_hash: refresh_token_hash.map(str::to_string),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_active_session() {
        assert!(user(Some("abc")).has_active_session());
        assert!(!user(None).has_active_session());
    }
}
