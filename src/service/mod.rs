//! Service layer: business rules over the persistence seam.
//!
//! [`TodoService`] resolves default ownership, forces the initial status on
//! new todos and applies field-level patches.

pub mod todo_service;

pub use todo_service::{TodoDraft, TodoService};
