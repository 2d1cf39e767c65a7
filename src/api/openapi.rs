//! OpenAPI document for the REST surface.

use axum::Json;
use axum::response::IntoResponse;
use utoipa::OpenApi;

use super::handlers;

/// Generated OpenAPI 3 description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "todo-backend",
        description = "CRUD API for user-scoped todo records."
    ),
    paths(
        handlers::user::create_user,
        handlers::todo::create_todo,
        handlers::todo::list_todos,
        handlers::todo::update_todo,
        handlers::todo::delete_todo,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Users", description = "User provisioning"),
        (name = "Todos", description = "Todo records"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;

/// `GET /api-docs/openapi.json` — Serves the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
