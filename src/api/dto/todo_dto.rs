//! Todo DTOs for create, list and update.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Todo, TodoPatch};
use crate::service::TodoDraft;

/// Request body for `POST /todos`.
///
/// Any `status` in the payload is ignored; new todos always start as
/// `"not started"`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Title.
    #[serde(default)]
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Priority.
    #[serde(default)]
    pub priority: i64,
    /// Owner. Omitted or `0` assigns the default user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl From<CreateTodoRequest> for TodoDraft {
    fn from(req: CreateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority,
            user_id: req.user_id,
        }
    }
}

/// Request body for `PUT /todos/{id}`.
///
/// Fields that are omitted or `null` keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New status; any text is accepted.
    #[serde(default)]
    pub status: Option<String>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<i64>,
    /// New owner; must reference an existing user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl From<UpdateTodoRequest> for TodoPatch {
    fn from(req: UpdateTodoRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            user_id: req.user_id,
        }
    }
}

/// Query parameters for `GET /todos`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTodosParams {
    /// Keep only todos whose title contains this text (case-sensitive).
    #[serde(default)]
    pub title: Option<String>,
}

/// Envelope returned by `GET /todos`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoListResponse {
    /// Matching todos in ascending id order.
    pub todos: Vec<Todo>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_request_tolerates_missing_fields_and_ignores_status() {
        let Ok(req) =
            serde_json::from_str::<CreateTodoRequest>(r#"{"title":"t","status":"done"}"#)
        else {
            panic!("should bind");
        };
        assert_eq!(req.title, "t");
        assert_eq!(req.description, "");
        assert_eq!(req.priority, 0);
        assert_eq!(req.user_id, None);
    }

    #[test]
    fn create_request_rejects_wrong_types() {
        let result = serde_json::from_str::<CreateTodoRequest>(r#"{"priority":"high"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_request_maps_to_sparse_patch() {
        let Ok(req) = serde_json::from_str::<UpdateTodoRequest>(r#"{"priority":5,"title":null}"#)
        else {
            panic!("should bind");
        };
        let patch = TodoPatch::from(req);
        assert_eq!(
            patch,
            TodoPatch {
                priority: Some(5),
                ..TodoPatch::default()
            }
        );
    }
}
