//! Handlers for the authenticated user's todo list.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::pagination::PaginationParams;
use crate::api::dto::todo::{TodoListResponse, TodoRequest, TodoResponse};
use crate::api::middleware::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a todo owned by the caller.
///
/// # Endpoint
///
/// `POST /api/todos`
///
/// # Request Body
///
/// ```json
/// { "title": "Buy milk", "description": "Two litres" }
/// ```
pub async fn create_todo_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<TodoRequest>,
) -> Result<(StatusCode, Json<TodoResponse>), AppError> {
    let todo = state
        .todo_service
        .create(user.user_id, &payload.title, &payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(todo.into())))
}

/// Lists the caller's todos, newest first.
///
/// # Endpoint
///
/// `GET /api/todos?page=1&limit=5`
///
/// # Response
///
/// ```json
/// { "data": [ ... ], "page": 1, "limit": 5, "total": 12 }
/// ```
pub async fn list_todos_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<TodoListResponse>, AppError> {
    let (page, limit) = params.page_and_limit();

    let page = state.todo_service.list(user.user_id, page, limit).await?;

    Ok(Json(page.into()))
}

/// Replaces title and description of one of the caller's todos.
///
/// # Endpoint
///
/// `PUT /api/todos/{id}`
///
/// # Errors
///
/// - 403 Forbidden if the todo belongs to someone else
/// - 404 Not Found if it does not exist
pub async fn update_todo_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<TodoRequest>,
) -> Result<Json<TodoResponse>, AppError> {
    let todo = state
        .todo_service
        .update(user.user_id, id, &payload.title, &payload.description)
        .await?;

    Ok(Json(todo.into()))
}

/// Deletes one of the caller's todos.
///
/// # Endpoint
///
/// `DELETE /api/todos/{id}`
pub async fn delete_todo_handler(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, AppError> {
    state.todo_service.delete(user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
