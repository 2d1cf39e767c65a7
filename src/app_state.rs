//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::TodoService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Todo service for all business logic.
    pub todo_service: Arc<TodoService>,
}

impl AppState {
    /// Wraps a service for sharing across handlers.
    #[must_use]
    pub fn new(todo_service: TodoService) -> Self {
        Self {
            todo_service: Arc::new(todo_service),
        }
    }
}
