//! PostgreSQL implementation of the persistence layer.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use super::TodoStore;
use super::models::{TodoRow, UserRow, todo_from_row, user_from_row};
use crate::config::DatabaseConfig;
use crate::domain::{NewTodo, NewUser, Todo, User};
use crate::error::AppError;

/// Opens a connection pool, retrying a bounded number of times.
///
/// Makes `config.connect_attempts` attempts separated by
/// `config.connect_retry_delay_secs`. Each failure before the last is
/// logged at `warn`.
///
/// # Errors
///
/// Returns the error of the final attempt if every attempt fails.
pub async fn connect_with_retry(
    options: PgConnectOptions,
    config: &DatabaseConfig,
) -> Result<PgPool, sqlx::Error> {
    let max_attempts = config.connect_attempts.max(1);
    let mut attempt = 1;
    loop {
        let result = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                tracing::info!(attempt, "connected to database");
                return Ok(pool);
            }
            Err(err) if attempt < max_attempts => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    retry_in_secs = config.connect_retry_delay_secs,
                    error = %err,
                    "failed to connect to database, retrying"
                );
                tokio::time::sleep(config.retry_delay()).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Applies the embedded schema migrations.
///
/// # Errors
///
/// Returns the migrator error if any migration fails to apply.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TodoStore for PostgresStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (username) VALUES ($1) \
             RETURNING id, username, created_at, updated_at, deleted_at",
        )
        .bind(&user.username)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_from_row(row))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, created_at, updated_at, deleted_at FROM users \
             WHERE username = $1 AND deleted_at IS NULL ORDER BY id LIMIT 1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(user_from_row))
    }

    async fn insert_todo(&self, todo: NewTodo) -> Result<Todo, AppError> {
        let row = sqlx::query_as::<_, TodoRow>(
            "INSERT INTO todos (title, description, status, priority, user_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, description, status, priority, user_id, \
             created_at, updated_at, deleted_at",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(&todo.status)
        .bind(todo.priority)
        .bind(todo.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo_from_row(row))
    }

    async fn list_todos(&self, title_contains: Option<&str>) -> Result<Vec<Todo>, AppError> {
        // strpos keeps the filter literal: `%` and `_` in user input are not
        // wildcards.
        let rows = sqlx::query_as::<_, TodoRow>(
            "SELECT id, title, description, status, priority, user_id, \
             created_at, updated_at, deleted_at FROM todos \
             WHERE deleted_at IS NULL AND ($1::text IS NULL OR strpos(title, $1) > 0) \
             ORDER BY id",
        )
        .bind(title_contains)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(todo_from_row).collect())
    }

    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, AppError> {
        let row = sqlx::query_as::<_, TodoRow>(
            "SELECT id, title, description, status, priority, user_id, \
             created_at, updated_at, deleted_at FROM todos \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(todo_from_row))
    }

    async fn save_todo(&self, todo: &Todo) -> Result<Option<Todo>, AppError> {
        let row = sqlx::query_as::<_, TodoRow>(
            "UPDATE todos SET title = $1, description = $2, status = $3, priority = $4, \
             user_id = $5, updated_at = $6 \
             WHERE id = $7 AND deleted_at IS NULL \
             RETURNING id, title, description, status, priority, user_id, \
             created_at, updated_at, deleted_at",
        )
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(&todo.status)
        .bind(todo.priority)
        .bind(todo.user_id)
        .bind(todo.updated_at)
        .bind(todo.id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(todo_from_row))
    }

    async fn soft_delete_todo(&self, id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE todos SET deleted_at = $1 WHERE id = $2 AND deleted_at IS NULL")
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
