//! Domain layer: users, todos and the patch rules for updates.

pub mod todo;
pub mod user;

pub use todo::{INITIAL_STATUS, NewTodo, Todo, TodoPatch};
pub use user::{NewUser, User};
