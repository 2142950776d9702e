//! Todo items scoped to their owner.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{NewTodo, Todo, TodoPatch};
use crate::domain::repositories::TodoRepository;
use crate::error::AppError;

pub const TITLE_MIN_LENGTH: usize = 3;
pub const TITLE_MAX_LENGTH: usize = 50;
pub const DESCRIPTION_MIN_LENGTH: usize = 3;
pub const DESCRIPTION_MAX_LENGTH: usize = 200;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of a user's todos.
#[derive(Debug, Clone)]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub page: u32,
    pub limit: u32,
    /// Number of todos the user owns overall.
    pub total: i64,
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let length = value.chars().count();
    if !(min..=max).contains(&length) {
        let mut label = field.to_string();
        label[..1].make_ascii_uppercase();

        return Err(AppError::bad_request(
            format!("{} must be between {} and {} characters", label, min, max),
            json!({ "field": field }),
        ));
    }

    Ok(())
}

/// Trims and validates title and description.
fn validated_fields(title: &str, description: &str) -> Result<(String, String), AppError> {
    let title = title.trim();
    let description = description.trim();

    if title.is_empty() || description.is_empty() {
        return Err(AppError::bad_request(
            "Title and description are required",
            json!({}),
        ));
    }

    check_length("title", title, TITLE_MIN_LENGTH, TITLE_MAX_LENGTH)?;
    check_length(
        "description",
        description,
        DESCRIPTION_MIN_LENGTH,
        DESCRIPTION_MAX_LENGTH,
    )?;

    Ok((title.to_string(), description.to_string()))
}

/// Service for todo CRUD.
///
/// Every operation takes the authenticated user id. Updates and deletes of
/// someone else's todo fail with [`AppError::Forbidden`].
pub struct TodoService<R: TodoRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: TodoRepository + ?Sized> TodoService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Todo, AppError> {
        let (title, description) = validated_fields(title, description)?;

        let todo = self
            .repository
            .create(NewTodo {
                user_id,
                title,
                description,
            })
            .await?;

        tracing::info!(user_id, todo_id = todo.id, "Todo created");
        Ok(todo)
    }

    /// Lists the user's todos, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is zero or `limit` is
    /// outside `1..=100`.
    pub async fn list(&self, user_id: i64, page: u32, limit: u32) -> Result<TodoPage, AppError> {
        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be at least 1",
                json!({ "field": "page" }),
            ));
        }

        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(AppError::bad_request(
                format!("Limit must be between 1 and {}", MAX_PAGE_SIZE),
                json!({ "field": "limit" }),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(limit);

        let todos = self
            .repository
            .list_for_user(user_id, offset, i64::from(limit))
            .await?;
        let total = self.repository.count_for_user(user_id).await?;

        Ok(TodoPage {
            todos,
            page,
            limit,
            total,
        })
    }

    /// Loads a todo and checks that `user_id` owns it.
    async fn owned(&self, user_id: i64, id: i64, action: &str) -> Result<Todo, AppError> {
        let todo = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Todo not found", json!({ "id": id })))?;

        if !todo.is_owned_by(user_id) {
            tracing::warn!(user_id, todo_id = id, "Todo access denied");
            return Err(AppError::forbidden(
                format!("Forbidden. You are not authorized to {} this todo", action),
                json!({}),
            ));
        }

        Ok(todo)
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        title: &str,
        description: &str,
    ) -> Result<Todo, AppError> {
        let (title, description) = validated_fields(title, description)?;
        self.owned(user_id, id, "update").await?;

        let todo = self
            .repository
            .update(id, TodoPatch { title, description })
            .await?
            .ok_or_else(|| AppError::not_found("Todo not found", json!({ "id": id })))?;

        tracing::info!(user_id, todo_id = id, "Todo updated");
        Ok(todo)
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        self.owned(user_id, id, "delete").await?;

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Todo not found", json!({ "id": id })));
        }

        tracing::info!(user_id, todo_id = id, "Todo deleted");
        Ok(())
    }
}
