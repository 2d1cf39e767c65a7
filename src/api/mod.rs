//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; `/health` and the
//! OpenAPI document live at the root.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Path the OpenAPI JSON document is served from.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the servable application: routes, state, API docs and the
/// tracing/CORS middleware stack.
pub fn build_app(state: AppState) -> Router {
    let app = build_router().with_state(state);

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url(OPENAPI_PATH, openapi::ApiDoc::openapi()),
        )
    };

    #[cfg(not(feature = "swagger-ui"))]
    let app = app.route(OPENAPI_PATH, axum::routing::get(openapi::openapi_json));

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::config::DEFAULT_USERNAME;
    use crate::domain::INITIAL_STATUS;
    use crate::persistence::{MemoryStore, TodoStore};
    use crate::service::TodoService;

    async fn make_app() -> (Router, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = TodoService::new(Arc::clone(&store) as Arc<dyn TodoStore>, DEFAULT_USERNAME);
        if service.ensure_default_user().await.is_err() {
            panic!("default user provisioning failed");
        }
        (build_app(AppState::new(service)), store)
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        let Ok(req) = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("invalid request");
        };
        req
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        let Ok(req) = Request::builder().method(method).uri(uri).body(Body::empty()) else {
            panic!("invalid request");
        };
        req
    }

    async fn send(app: &Router, req: Request<Body>) -> Response {
        let Ok(response) = app.clone().oneshot(req).await else {
            panic!("router is infallible");
        };
        response
    }

    async fn body_json(response: Response) -> Value {
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        let Ok(value) = serde_json::from_slice(&bytes) else {
            panic!("body is not json");
        };
        value
    }

    async fn create_todo(app: &Router, body: Value) -> Value {
        let response = send(app, json_request("POST", "/api/v1/todos", &body.to_string())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (app, _) = make_app().await;
        let response = send(&app, empty_request("GET", "/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn openapi_document_lists_todo_paths() {
        let (app, _) = make_app().await;
        let response = send(&app, empty_request("GET", OPENAPI_PATH)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"]["/api/v1/todos"].is_object());
        assert!(doc["paths"]["/api/v1/todos/{id}"].is_object());
    }

    #[tokio::test]
    async fn create_user_returns_created() {
        let (app, _) = make_app().await;
        let response = send(
            &app,
            json_request("POST", "/api/v1/users", r#"{"username":"alice"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let user = body_json(response).await;
        assert_eq!(user["username"], "alice");
        assert!(user["id"].as_i64().is_some_and(|id| id > 0));
    }

    #[tokio::test]
    async fn create_todo_forces_status_and_default_owner() {
        let (app, store) = make_app().await;
        let Ok(Some(default_user)) = store.find_user_by_username(DEFAULT_USERNAME).await else {
            panic!("default user missing");
        };

        let todo = create_todo(
            &app,
            json!({"title": "ship it", "description": "v1", "priority": 3, "status": "done"}),
        )
        .await;
        assert_eq!(todo["status"], INITIAL_STATUS);
        assert_eq!(todo["user_id"], default_user.id);
        assert_eq!(todo["priority"], 3);
    }

    #[tokio::test]
    async fn list_filters_by_title_inside_envelope() {
        let (app, _) = make_app().await;
        create_todo(&app, json!({"title": "foo one"})).await;
        create_todo(&app, json!({"title": "bar"})).await;
        create_todo(&app, json!({"title": "xfoox"})).await;

        let response = send(&app, empty_request("GET", "/api/v1/todos?title=foo")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let Some(todos) = body["todos"].as_array() else {
            panic!("missing envelope");
        };
        assert_eq!(todos.len(), 2);

        let all = body_json(send(&app, empty_request("GET", "/api/v1/todos")).await).await;
        assert!(all["todos"].as_array().is_some_and(|t| t.len() == 3));
    }

    #[tokio::test]
    async fn update_missing_todo_is_404() {
        let (app, store) = make_app().await;
        let response = send(
            &app,
            json_request("PUT", "/api/v1/todos/999", r#"{"priority":5}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], 2001);
        assert_eq!(store.todo_rows().await, 0);
    }

    #[tokio::test]
    async fn update_missing_todo_with_bad_body_is_404() {
        let (app, store) = make_app().await;
        let response = send(&app, json_request("PUT", "/api/v1/todos/999", "{not json")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["code"], 2001);
        assert_eq!(store.todo_rows().await, 0);
    }

    #[tokio::test]
    async fn bad_query_string_uses_error_envelope() {
        let (app, _) = make_app().await;
        create_todo(&app, json!({"title": "a"})).await;

        let response = send(&app, empty_request("GET", "/api/v1/todos?title=a&title=b")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], 1001);
        assert!(
            body["error"]["message"]
                .as_str()
                .is_some_and(|m| m.contains("duplicate field"))
        );
    }

    #[tokio::test]
    async fn update_priority_only() {
        let (app, store) = make_app().await;
        let todo = create_todo(&app, json!({"title": "t", "description": "d"})).await;
        let id = todo["id"].as_i64().unwrap_or_default();

        let response = send(
            &app,
            json_request("PUT", &format!("/api/v1/todos/{id}"), r#"{"priority":5}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let Ok(Some(stored)) = store.find_todo(id).await else {
            panic!("todo vanished");
        };
        assert_eq!(stored.priority, 5);
        assert_eq!(stored.title, "t");
        assert_eq!(stored.description, "d");
        assert_eq!(stored.status, INITIAL_STATUS);
    }

    #[tokio::test]
    async fn delete_then_delete_again() {
        let (app, _) = make_app().await;
        let todo = create_todo(&app, json!({"title": "gone soon"})).await;
        let uri = format!("/api/v1/todos/{}", todo["id"]);

        let first = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(first.status(), StatusCode::NO_CONTENT);
        let second = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(second.status(), StatusCode::NOT_FOUND);

        let all = body_json(send(&app, empty_request("GET", "/api/v1/todos")).await).await;
        assert!(all["todos"].as_array().is_some_and(Vec::is_empty));
    }

    #[tokio::test]
    async fn malformed_json_is_400_on_every_write() {
        let (app, store) = make_app().await;
        let users_before = store.user_rows().await;
        let todo = create_todo(&app, json!({"title": "x"})).await;
        let uri = format!("/api/v1/todos/{}", todo["id"]);

        for (method, path) in [
            ("POST", "/api/v1/users"),
            ("POST", "/api/v1/todos"),
            ("PUT", uri.as_str()),
        ] {
            let response = send(&app, json_request(method, path, "{not json")).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {path}");
            assert_eq!(body_json(response).await["error"]["code"], 1001);
        }

        assert_eq!(store.user_rows().await, users_before);
        assert_eq!(store.todo_rows().await, 1);
    }

    #[tokio::test]
    async fn wrong_field_type_and_missing_content_type_are_400() {
        let (app, store) = make_app().await;
        let response = send(
            &app,
            json_request("POST", "/api/v1/todos", r#"{"priority":"high"}"#),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let Ok(no_header) = Request::builder()
            .method("POST")
            .uri("/api/v1/todos")
            .body(Body::from(r#"{"title":"x"}"#))
        else {
            panic!("invalid request");
        };
        let response = send(&app, no_header).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(store.todo_rows().await, 0);
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let (app, _) = make_app().await;
        let response = send(&app, empty_request("DELETE", "/api/v1/todos/abc")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_default_user_is_500_with_generic_body() {
        let store = Arc::new(MemoryStore::new());
        let service = TodoService::new(store as Arc<dyn TodoStore>, DEFAULT_USERNAME);
        let app = build_app(AppState::new(service));

        let response = send(&app, json_request("POST", "/api/v1/todos", r#"{"title":"x"}"#)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"]["message"],
            "default user is not provisioned"
        );
    }
}
