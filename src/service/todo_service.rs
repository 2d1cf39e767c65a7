//! Todo service: the rules that sit between handlers and the store.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{INITIAL_STATUS, NewTodo, NewUser, Todo, TodoPatch, User};
use crate::error::AppError;
use crate::persistence::TodoStore;

/// Owner and content of a todo before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Priority.
    pub priority: i64,
    /// Requested owner. `None` or `Some(0)` means the default user.
    pub user_id: Option<i64>,
}

/// Orchestration layer for user and todo operations.
///
/// Stateless apart from the injected store: it resolves the default owner,
/// forces the initial status and applies patches, leaving query
/// construction to the [`TodoStore`].
#[derive(Debug, Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
    default_username: String,
}

impl TodoService {
    /// Creates a service over `store`. Todos without an owner are assigned
    /// to the user named `default_username`.
    #[must_use]
    pub fn new(store: Arc<dyn TodoStore>, default_username: impl Into<String>) -> Self {
        Self {
            store,
            default_username: default_username.into(),
        }
    }

    /// Makes sure the default user exists, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the lookup or insert fails.
    pub async fn ensure_default_user(&self) -> Result<User, AppError> {
        let user = self
            .store
            .find_or_create_user(&self.default_username)
            .await?;
        tracing::info!(user_id = user.id, username = %user.username, "default user ready");
        Ok(user)
    }

    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn create_user(&self, username: String) -> Result<User, AppError> {
        let user = self.store.insert_user(NewUser { username }).await?;
        tracing::info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Creates a todo with the initial status.
    ///
    /// A missing or zero owner is replaced by the default user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DefaultUserMissing`] if the default user is
    /// needed but absent, or [`AppError::Persistence`] on store failure.
    pub async fn create_todo(&self, draft: TodoDraft) -> Result<Todo, AppError> {
        let user_id = match draft.user_id.filter(|id| *id != 0) {
            Some(id) => id,
            None => self.default_user_id().await?,
        };

        let todo = self
            .store
            .insert_todo(NewTodo {
                title: draft.title,
                description: draft.description,
                status: INITIAL_STATUS.to_string(),
                priority: draft.priority,
                user_id,
            })
            .await?;

        tracing::info!(todo_id = todo.id, user_id, "todo created");
        Ok(todo)
    }

    /// Lists todos, optionally keeping only titles that contain `title`.
    ///
    /// An empty filter is treated as no filter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    pub async fn list_todos(&self, title: Option<&str>) -> Result<Vec<Todo>, AppError> {
        let filter = title.filter(|t| !t.is_empty());
        self.store.list_todos(filter).await
    }

    /// Applies `patch` to the todo with the given id.
    ///
    /// The todo is looked up before `patch` is inspected, so a missing id
    /// wins over a body that failed to bind.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if there is no live todo with that
    /// id, the binding error carried by `patch`, or
    /// [`AppError::Persistence`] on store failure.
    pub async fn update_todo(
        &self,
        id: i64,
        patch: Result<TodoPatch, AppError>,
    ) -> Result<Todo, AppError> {
        let mut todo = self
            .store
            .find_todo(id)
            .await?
            .ok_or(AppError::TodoNotFound(id))?;

        patch?.apply(&mut todo, Utc::now());

        // The row may have been deleted between the fetch and the save.
        let saved = self
            .store
            .save_todo(&todo)
            .await?
            .ok_or(AppError::TodoNotFound(id))?;

        tracing::info!(todo_id = id, "todo updated");
        Ok(saved)
    }

    /// Soft-deletes the todo with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::TodoNotFound`] if there is no live todo with that
    /// id, or [`AppError::Persistence`] on store failure.
    pub async fn delete_todo(&self, id: i64) -> Result<(), AppError> {
        if self.store.find_todo(id).await?.is_none() {
            return Err(AppError::TodoNotFound(id));
        }
        if !self.store.soft_delete_todo(id).await? {
            return Err(AppError::TodoNotFound(id));
        }
        tracing::info!(todo_id = id, "todo deleted");
        Ok(())
    }

    async fn default_user_id(&self) -> Result<i64, AppError> {
        self.store
            .find_user_by_username(&self.default_username)
            .await?
            .map(|user| user.id)
            .ok_or_else(|| AppError::DefaultUserMissing(self.default_username.clone()))
    }
}
