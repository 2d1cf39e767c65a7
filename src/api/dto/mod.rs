//! Data Transfer Objects for REST request/response serialization.
//!
//! Request bodies mirror loose JSON binding: every field is optional and
//! absent fields take their zero value.

pub mod todo_dto;
pub mod user_dto;

pub use todo_dto::*;
pub use user_dto::*;
