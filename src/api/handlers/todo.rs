//! Todo CRUD handlers: create, list, update, delete.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};

use crate::api::dto::{CreateTodoRequest, ListTodosParams, TodoListResponse, UpdateTodoRequest};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::app_state::AppState;
use crate::domain::Todo;
use crate::error::{AppError, ErrorResponse};

/// `POST /todos` — Create a todo.
///
/// # Errors
///
/// Returns [`AppError`] on a malformed body, a missing default user or
/// store failure.
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    tag = "Todos",
    summary = "Create a todo",
    description = "Creates a todo with status \"not started\". Without a `user_id` (or with 0) the todo is owned by the default user.",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Default user missing or store failure", body = ErrorResponse),
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTodoRequest>,
) -> Result<impl IntoResponse, AppError> {
    let todo = state.todo_service.create_todo(req.into()).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `GET /todos` — List todos, optionally filtered by title.
///
/// # Errors
///
/// Returns [`AppError`] on a malformed query string or store failure.
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    tag = "Todos",
    summary = "List todos",
    description = "Returns every todo, or only those whose title contains `title`.",
    params(ListTodosParams),
    responses(
        (status = 200, description = "Matching todos", body = TodoListResponse),
        (status = 400, description = "Malformed query string", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_todos(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListTodosParams>,
) -> Result<impl IntoResponse, AppError> {
    let todos = state
        .todo_service
        .list_todos(params.title.as_deref())
        .await?;
    Ok(Json(TodoListResponse { todos }))
}

/// `PUT /todos/{id}` — Patch a todo.
///
/// # Errors
///
/// Returns [`AppError`] on a malformed body or id, a missing todo or store
/// failure.
#[utoipa::path(
    put,
    path = "/api/v1/todos/{id}",
    tag = "Todos",
    summary = "Update a todo",
    description = "Overwrites the fields present in the body; omitted or null fields keep their value.",
    params(
        ("id" = i64, Path, description = "Todo id"),
    ),
    request_body = UpdateTodoRequest,
    responses(
        (status = 204, description = "Todo updated"),
        (status = 400, description = "Malformed id, or malformed JSON body for an existing todo", body = ErrorResponse),
        (status = 404, description = "Todo not found, checked before the body", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    body: Result<ApiJson<UpdateTodoRequest>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    let patch = body.map(|ApiJson(req)| req.into());
    state.todo_service.update_todo(id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /todos/{id}` — Soft-delete a todo.
///
/// # Errors
///
/// Returns [`AppError`] on a malformed id, a missing todo or store failure.
#[utoipa::path(
    delete,
    path = "/api/v1/todos/{id}",
    tag = "Todos",
    summary = "Delete a todo",
    description = "Marks the todo as deleted; it disappears from listings.",
    params(
        ("id" = i64, Path, description = "Todo id"),
    ),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Todo not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, AppError> {
    state.todo_service.delete_todo(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Todo routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo).get(list_todos))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
}
