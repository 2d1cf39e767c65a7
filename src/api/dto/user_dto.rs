//! User DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name. Defaults to the empty string.
    #[serde(default)]
    pub username: String,
}
