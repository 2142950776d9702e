//! DTOs for todo endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::services::TodoPage;
use crate::domain::entities::Todo;

/// Request body for creating or replacing a todo.
#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Todo> for TodoResponse {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            title: todo.title,
            description: todo.description,
            created_at: todo.created_at,
            updated_at: todo.updated_at,
        }
    }
}

/// Paginated todo listing.
#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub data: Vec<TodoResponse>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
}

impl From<TodoPage> for TodoListResponse {
    fn from(page: TodoPage) -> Self {
        Self {
            data: page.todos.into_iter().map(TodoResponse::from).collect(),
            page: page.page,
            limit: page.limit,
            total: page.total,
        }
    }
}
