//! PostgreSQL implementation of todo repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewTodo, Todo, TodoPatch};
use crate::domain::repositories::TodoRepository;
use crate::error::AppError;

const TODO_COLUMNS: &str = "id, user_id, title, description, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i64,
    user_id: i64,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoRow> for Todo {
    fn from(row: TodoRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL repository for todo items.
pub struct PgTodoRepository {
    pool: Arc<PgPool>,
}

impl PgTodoRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn create(&self, new_todo: NewTodo) -> Result<Todo, AppError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
            INSERT INTO todos (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(new_todo.user_id)
        .bind(new_todo.title)
        .bind(new_todo.description)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            "SELECT {TODO_COLUMNS} FROM todos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Todo::from))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Todo>, AppError> {
        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Todo::from).collect())
    }

    async fn count_for_user(&self, user_id: i64) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn update(&self, id: i64, patch: TodoPatch) -> Result<Option<Todo>, AppError> {
        let row = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
            UPDATE todos
            SET title = $2, description = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {TODO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Todo::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
