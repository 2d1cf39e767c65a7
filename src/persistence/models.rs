//! Row shapes for the `users` and `todos` tables.
//!
//! Queries decode into tuples in column order and are converted into the
//! domain types here. Every query in [`super::postgres`] selects columns in
//! the order documented on the row aliases.

use chrono::{DateTime, Utc};

use crate::domain::{Todo, User};

/// A decoded `users` row: `id, username, created_at, updated_at, deleted_at`.
pub type UserRow = (
    i64,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

/// A decoded `todos` row: `id, title, description, status, priority,
/// user_id, created_at, updated_at, deleted_at`.
pub type TodoRow = (
    i64,
    String,
    String,
    String,
    i64,
    i64,
    DateTime<Utc>,
    DateTime<Utc>,
    Option<DateTime<Utc>>,
);

/// Converts a decoded user row into a [`User`].
#[must_use]
pub fn user_from_row(row: UserRow) -> User {
    let (id, username, created_at, updated_at, deleted_at) = row;
    User {
        id,
        username,
        created_at,
        updated_at,
        deleted_at,
    }
}

/// Converts a decoded todo row into a [`Todo`].
#[must_use]
pub fn todo_from_row(row: TodoRow) -> Todo {
    let (id, title, description, status, priority, user_id, created_at, updated_at, deleted_at) =
        row;
    Todo {
        id,
        title,
        description,
        status,
        priority,
        user_id,
        created_at,
        updated_at,
        deleted_at,
    }
}
