//! User handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::CreateUserRequest;
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::domain::User;
use crate::error::{AppError, ErrorResponse};

/// `POST /users` — Create a user.
///
/// # Errors
///
/// Returns [`AppError`] on a malformed body or store failure.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Create a user",
    description = "Inserts a user. The username is free text and may be empty.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.todo_service.create_user(req.username).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}
