use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_database::StoreError;
use shared_models::auth::Role;
use shared_models::error::AppError;

pub const USERS_COLLECTION: &str = "users";

fn default_role() -> Role {
    Role::User
}

/// A stored account. `password` holds the Argon2 PHC string, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty", default)]
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCreation {
    Created(String),
    AlreadyExists,
    /// The username belongs to a non-admin account, which is left as is.
    UsernameTaken,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Fields 'username' and 'password' are required")]
    MissingCredentials,

    #[error("User '{0}' already exists")]
    UsernameTaken(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Refusing to delete the last remaining admin")]
    LastAdmin,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Stored user is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::MissingCredentials | UserError::UsernameTaken(_) | UserError::LastAdmin => {
                AppError::BadRequest(err.to_string())
            }
            UserError::InvalidCredentials => AppError::Auth(err.to_string()),
            UserError::Store(store) => store.into(),
            other => AppError::Internal(other.to_string()),
        }
    }
}
