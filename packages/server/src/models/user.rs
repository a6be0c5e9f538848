use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_required_text;
use crate::error::AppError;

const MAX_NAME_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 254;

/// Request body for registering a user.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Jane Smith")]
    pub name: Option<String>,
    /// Unique email address.
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
}

/// Request body for a partial user update. Omitted fields are left untouched.
#[derive(Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = "jane.doe@example.com")]
    pub email: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Jane Smith")]
    pub name: String,
    #[schema(example = "jane@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(m: crate::entity::user::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Validated, trimmed fields of a new user.
pub struct NewUser {
    pub name: String,
    pub email: String,
}

pub fn validate_name(name: &str) -> Result<String, AppError> {
    validate_required_text(name, "Name", MAX_NAME_LENGTH).map(str::to_string)
}

/// Trimmed email with exactly one `@` and non-empty local and domain parts.
pub fn validate_email(email: &str) -> Result<String, AppError> {
    let email = validate_required_text(email, "Email", MAX_EMAIL_LENGTH)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation("Email is not a valid address".into()));
    }
    Ok(email.to_string())
}

pub fn validate_create_user(req: &CreateUserRequest) -> Result<NewUser, AppError> {
    let name = validate_name(req.name.as_deref().unwrap_or_default())?;
    let email = validate_email(req.email.as_deref().unwrap_or_default())?;
    Ok(NewUser { name, email })
}

pub fn validate_update_user(req: &UpdateUserRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name(name)?;
    }
    if let Some(ref email) = req.email {
        validate_email(email)?;
    }
    Ok(())
}
