//! In-memory user repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use super::Table;
use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    table: RwLock<Table<User>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "users_email_key" }),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: table.next_id(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };

        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn replace_refresh_token(
        &self,
        id: i64,
        token_hash: Option<String>,
    ) -> Result<bool, AppError> {
        let mut table = self.table.write().await;

        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(false);
        };

        user.refresh_token_hash = token_hash;
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn swap_refresh_token(
        &self,
        id: i64,
        expected: &str,
        replacement: &str,
    ) -> Result<bool, AppError> {
        let mut table = self.table.write().await;

        match table.rows.get_mut(&id) {
            Some(user) if user.refresh_token_hash.as_deref() == Some(expected) => {
                user.refresh_token_hash = Some(replacement.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = MemoryUserRepository::new();

        let a = repo.create(new_user("a@x.com")).await.unwrap();
        let b = repo.create(new_user("b@x.com")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(a.refresh_token_hash.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("a@x.com")).await.unwrap();

        assert!(matches!(
            repo.create(new_user("a@x.com")).await,
            Err(AppError::Conflict { .. })
        ));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_swap_only_when_expected_matches() {
        let repo = MemoryUserRepository::new();
        let user = repo.create(new_user("a@x.com")).await.unwrap();

        assert!(!repo.swap_refresh_token(user.id, "old", "new").await.unwrap());

        repo.replace_refresh_token(user.id, Some("old".to_string()))
            .await
            .unwrap();

        assert!(repo.swap_refresh_token(user.id, "old", "new").await.unwrap());
        assert!(!repo.swap_refresh_token(user.id, "old", "newer").await.unwrap());

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token_hash.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_replace_unknown_user() {
        let repo = MemoryUserRepository::new();
        assert!(!repo.replace_refresh_token(42, None).await.unwrap());
    }
}
