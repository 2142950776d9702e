//! In-memory short URL repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use super::Table;
use crate::domain::entities::{NewShortUrl, ShortUrl};
use crate::domain::repositories::ShortUrlRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct MemoryShortUrlRepository {
    table: RwLock<Table<ShortUrl>>,
}

impl MemoryShortUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShortUrlRepository for MemoryShortUrlRepository {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, AppError> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|s| s.code == new_url.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "short_urls_code_key" }),
            ));
        }

        let now = Utc::now();
        let short_url = ShortUrl {
            id: table.next_id(),
            code: new_url.code,
            url: new_url.url,
            access_count: 0,
            created_at: now,
            updated_at: now,
        };

        table.rows.insert(short_url.id, short_url.clone());
        Ok(short_url)
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.table.read().await.rows.values().any(|s| s.code == code))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortUrl>, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|s| s.code == code).cloned())
    }

    async fn increment_access_count(
        &self,
        code: &str,
        delta: i64,
    ) -> Result<Option<ShortUrl>, AppError> {
        let mut table = self.table.write().await;

        Ok(table
            .rows
            .values_mut()
            .find(|s| s.code == code)
            .map(|s| {
                s.access_count += delta;
                s.clone()
            }))
    }

    async fn update_url(&self, code: &str, url: &str) -> Result<Option<ShortUrl>, AppError> {
        let mut table = self.table.write().await;

        Ok(table
            .rows
            .values_mut()
            .find(|s| s.code == code)
            .map(|s| {
                s.url = url.to_string();
                s.updated_at = Utc::now();
                s.clone()
            }))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|_, s| s.code != code);
        Ok(table.rows.len() < before)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}
