//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::User;

/// User API representation.
///
/// The stored password hash is not part of outbound payloads.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub login: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            login: u.login,
            role: u.role,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    /// Identifier for the new record; generated server-side when omitted
    pub id: Option<Uuid>,
    #[validate(length(min = 3, max = 200, message = "must be 3-200 characters"))]
    pub name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 100, message = "may have at most 100 characters")
    )]
    pub login: String,
    #[validate(length(min = 6, max = 200, message = "must be 6-200 characters"))]
    pub password: String,
    #[validate(length(min = 3, max = 20, message = "must be 3-20 characters"))]
    pub role: String,
}

/// Update user request. Must carry the same id as the request path.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    #[validate(length(min = 3, max = 200, message = "must be 3-200 characters"))]
    pub name: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 100, message = "may have at most 100 characters")
    )]
    pub login: String,
    /// Absent or blank keeps the stored password unchanged
    #[validate(custom(function = password_if_present))]
    pub password: Option<String>,
    #[validate(length(min = 3, max = 20, message = "must be 3-20 characters"))]
    pub role: String,
}

fn password_if_present(password: &str) -> Result<(), ValidationError> {
    // blank means "keep the current password"
    if password.trim().is_empty() {
        return Ok(());
    }
    if password.len() < 6 || password.len() > 200 {
        let mut err = ValidationError::new("length");
        err.message = Some("must be 6-200 characters when set".into());
        return Err(err);
    }
    Ok(())
}
