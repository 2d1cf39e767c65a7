//! # todo-backend
//!
//! REST API for user-scoped todo records backed by PostgreSQL.
//!
//! A default user is provisioned at startup and owns every todo created
//! without an explicit owner. Todos are soft-deleted.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TodoService (service/)
//!     │
//!     ├── TodoStore (persistence/)
//!     │     ├── PostgresStore
//!     │     └── MemoryStore
//!     │
//!     └── PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod telemetry;
