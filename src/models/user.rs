// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::pagination::PaginationMeta;

pub const DEFAULT_ROLE: &str = "member";

/// Projection used by every user read; the password column is never selected.
pub const USER_COLUMNS: &str =
    "id, full_name, email, phone, state, lga, ward, has_pvc, role, created_at";

// ==================== USER ====================

/// A stored user as returned to callers. There is no password field.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub state: Option<String>,
    pub lga: Option<String>,
    pub ward: Option<String>,
    pub has_pvc: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(max = 255, message = "Full name cannot exceed 255 characters"))]
    pub full_name: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email cannot exceed 255 characters")
    )]
    pub email: Option<String>,

    #[validate(length(max = 50, message = "Phone cannot exceed 50 characters"))]
    pub phone: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,

    #[validate(length(max = 255, message = "State cannot exceed 255 characters"))]
    pub state: Option<String>,

    #[validate(length(max = 255, message = "LGA cannot exceed 255 characters"))]
    pub lga: Option<String>,

    #[validate(length(max = 255, message = "Ward cannot exceed 255 characters"))]
    pub ward: Option<String>,

    #[serde(rename = "hasPVC", default, deserialize_with = "only_json_true")]
    pub has_pvc: bool,

    #[validate(length(max = 50, message = "Role cannot exceed 50 characters"))]
    pub role: Option<String>,
}

/// Only the JSON literal `true` counts; strings, numbers and null are false.
fn only_json_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(matches!(value, serde_json::Value::Bool(true)))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Validated, ready-to-insert user. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub state: Option<String>,
    pub lga: Option<String>,
    pub ward: Option<String>,
    pub has_pvc: bool,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl CreateUserRequest {
    /// Returns (full name, email, password) or a 400 when any is missing.
    pub fn required_fields(&self) -> ApiResult<(&str, &str, &str)> {
        match (
            present(&self.full_name),
            present(&self.email),
            present(&self.password),
        ) {
            (Some(full_name), Some(email), Some(password)) => Ok((full_name, email, password)),
            _ => Err(ApiError::missing_required_fields()),
        }
    }

    pub fn resolved_role(&self) -> String {
        present(&self.role).unwrap_or(DEFAULT_ROLE).to_string()
    }

    pub fn into_new_user(self, password_hash: String) -> ApiResult<NewUser> {
        let (full_name, email, _) = self.required_fields()?;
        let full_name = full_name.to_string();
        let email = email.to_string();
        let role = self.resolved_role();

        Ok(NewUser {
            id: uuid::Uuid::new_v4().to_string(),
            full_name,
            email,
            phone: self.phone,
            password_hash,
            state: self.state,
            lga: self.lga,
            ward: self.ward,
            has_pvc: self.has_pvc,
            role,
            created_at: Utc::now(),
        })
    }
}

/// One page of the user listing.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user: User,
}
