//! Persistence layer: the [`TodoStore`] seam and its implementations.
//!
//! [`postgres::PostgresStore`] is the production backend built on
//! `sqlx::PgPool`. [`memory::MemoryStore`] keeps the same semantics in
//! process memory and backs the test suite and `STORAGE_BACKEND=memory`.
//!
//! Every read hides soft-deleted rows. A lookup that finds nothing returns
//! `Ok(None)`; `Err` is reserved for store failures.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{NewTodo, NewUser, Todo, User};
use crate::error::AppError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Data access operations for users and todos.
#[async_trait]
pub trait TodoStore: Send + Sync + std::fmt::Debug {
    /// Inserts a user and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    /// Returns the oldest live user named `username`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Returns the oldest live user named `username`, inserting one first if
    /// none exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    async fn find_or_create_user(&self, username: &str) -> Result<User, AppError> {
        match self.find_user_by_username(username).await? {
            Some(user) => Ok(user),
            None => self.insert_user(NewUser::new(username)).await,
        }
    }

    /// Inserts a todo and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure, including a
    /// `user_id` that does not reference an existing user.
    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, AppError>;

    /// Lists live todos in ascending id order, optionally keeping only those
    /// whose title contains `title_contains` verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    async fn list_todos(&self, title_contains: Option<&str>) -> Result<Vec<Todo>, AppError>;

    /// Fetches a live todo by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, AppError>;

    /// Writes every mutable field of `todo` back to its row.
    ///
    /// Returns `None` if the row no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure, including a
    /// `user_id` that does not reference an existing user.
    async fn save_todo(&self, todo: &Todo) -> Result<Option<Todo>, AppError>;

    /// Marks a live todo as deleted. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on store failure.
    async fn soft_delete_todo(&self, id: i64) -> Result<bool, AppError>;
}
