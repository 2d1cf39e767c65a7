//! Todo aggregate and its patch semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status every todo is created with, whatever the request says.
pub const INITIAL_STATUS: &str = "not started";

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    /// Store-assigned identifier.
    pub id: i64,
    /// Short title; the list filter matches against it.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Opaque status text.
    pub status: String,
    /// Unbounded priority.
    pub priority: i64,
    /// Owning user.
    pub user_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Always `None` for rows returned by reads.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fully resolved insert request: owner and status are already decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Status written to the row.
    pub status: String,
    /// Priority.
    pub priority: i64,
    /// Owning user; must reference an existing user.
    pub user_id: i64,
}

/// Field-level patch applied on top of a stored todo.
///
/// `None` keeps the stored value. Identifier and timestamps are not
/// patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New status.
    pub status: Option<String>,
    /// New priority.
    pub priority: Option<i64>,
    /// New owner.
    pub user_id: Option<i64>,
}

impl TodoPatch {
    /// Overwrites the fields present in the patch and bumps `updated_at`.
    pub fn apply(self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(user_id) = self.user_id {
            todo.user_id = user_id;
        }
        todo.updated_at = now;
    }
}
