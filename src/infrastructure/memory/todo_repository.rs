//! In-memory todo repository.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Table;
use crate::domain::entities::{NewTodo, Todo, TodoPatch};
use crate::domain::repositories::TodoRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct MemoryTodoRepository {
    table: RwLock<Table<Todo>>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoRepository for MemoryTodoRepository {
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError> {
        let mut table = self.table.write().await;

        let now = Utc::now();
        let todo = Todo {
            id: table.next_id(),
            user_id: new_todo.user_id,
            title: new_todo.title,
            description: new_todo.description,
            created_at: now,
            updated_at: now,
        };

        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, AppError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Todo>, AppError> {
        let table = self.table.read().await;

        // Ids grow with creation time, so reverse id order is newest first.
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|t| t.user_id == user_id)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|t| t.user_id == user_id).count() as i64)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<Todo>, AppError> {
        let mut table = self.table.write().await;

        Ok(table.rows.get_mut(&id).map(|t| {
            t.title = patch.title;
            t.description = patch.description;
            t.updated_at = Utc::now();
            t.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(repo: &MemoryTodoRepository, user_id: i64, n: usize) {
        for i in 0..n {
            repo.create(NewTodo {
                user_id,
                title: format!("Todo {i}"),
                description: "Something".to_string(),
            })
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_for_user_pages_newest_first() {
        let repo = MemoryTodoRepository::new();
        seed(&repo, 1, 7).await;
        seed(&repo, 2, 3).await;

        let first = repo.list_for_user(1, 0, 5).await.unwrap();
        let second = repo.list_for_user(1, 5, 5).await.unwrap();

        assert_eq!(first.len(), 5);
        assert_eq!(first[0].title, "Todo 6");
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|t| t.user_id == 1));
        assert_eq!(repo.count_for_user(1).await.unwrap(), 7);
        assert_eq!(repo.count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let repo = MemoryTodoRepository::new();
        let patch = TodoPatch {
            title: "New".to_string(),
            description: "New".to_string(),
        };

        assert!(repo.update(1, patch).await.unwrap().is_none());
        assert!(!repo.delete(1).await.unwrap());
    }
}
