//! Repository trait for todo items.

use crate::domain::entities::{NewTodo, Todo, TodoPatch};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for todos.
///
/// Ownership is not enforced here; [`crate::application::services::TodoService`]
/// checks it before mutating.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, AppError>;

    /// Lists a user's todos, newest first.
    ///
    /// # Arguments
    ///
    /// - `offset` - Number of rows to skip
    /// - `limit` - Maximum number of rows to return
    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Todo>, AppError>;

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError>;

    /// Replaces title and description. Returns `None` if the todo is gone.
    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<Todo>, AppError>;

    /// Returns `Ok(false)` if the todo did not exist.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Counts todos across all users.
    async fn count(&self) -> Result<i64, AppError>;
}
