//! In-process store with the same observable semantics as PostgreSQL.
//!
//! [`MemoryStore`] keeps users and todos in ordered maps behind a single
//! [`tokio::sync::RwLock`]. Identifiers are assigned from monotonically
//! increasing counters starting at 1, soft deletes set `deleted_at`, and
//! todo writes check that the owning user exists, mirroring the foreign key
//! on `todos.user_id`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::TodoStore;
use crate::domain::{NewTodo, NewUser, Todo, User};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    todos: BTreeMap<i64, Todo>,
    last_user_id: i64,
    last_todo_id: i64,
}

impl Tables {
    fn check_owner(&self, user_id: i64) -> Result<(), AppError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(AppError::Persistence(format!(
                "foreign key violation: user {user_id} does not exist"
            )))
        }
    }
}

/// Memory-backed [`TodoStore`].
///
/// # Concurrency
///
/// Reads share the lock; every write takes it exclusively, so concurrent
/// updates to the same todo are last-write-wins.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of todos, including soft-deleted ones.
    pub async fn todo_rows(&self) -> usize {
        self.tables.read().await.todos.len()
    }

    /// Number of users, including soft-deleted ones.
    pub async fn user_rows(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.write().await;
        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            username: user.username,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.deleted_at.is_none() && u.username == username)
            .cloned())
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let mut tables = self.tables.write().await;
        tables.check_owner(todo.user_id)?;
        tables.last_todo_id += 1;
        let now = Utc::now();
        let todo = Todo {
            id: tables.last_todo_id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            priority: todo.priority,
            user_id: todo.user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn list_todos(&self, title_contains: Option<&str>) -> Result<Vec<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .values()
            .filter(|t| t.deleted_at.is_none())
            .filter(|t| title_contains.is_none_or(|needle| t.title.contains(needle)))
            .cloned()
            .collect())
    }

    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .get(&id)
            .filter(|t| t.deleted_at.is_none())
            .cloned())
    }

    async fn save_todo(&self, todo: &Todo) -> Result<Option<Todo>, AppError> {
        let mut tables = self.tables.write().await;
        let live = tables
            .todos
            .get(&todo.id)
            .is_some_and(|t| t.deleted_at.is_none());
        if !live {
            return Ok(None);
        }
        tables.check_owner(todo.user_id)?;
        let Some(stored) = tables.todos.get_mut(&todo.id) else {
            return Ok(None);
        };
        stored.title.clone_from(&todo.title);
        stored.description.clone_from(&todo.description);
        stored.status.clone_from(&todo.status);
        stored.priority = todo.priority;
        stored.user_id = todo.user_id;
        stored.updated_at = todo.updated_at;
        Ok(Some(stored.clone()))
    }

    async fn soft_delete_todo(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.todos.get_mut(&id) {
            Some(todo) if todo.deleted_at.is_none() => {
                todo.deleted_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
