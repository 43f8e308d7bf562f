use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use shared_database::{AppState, Document, DocumentId, DocumentStore};
use shared_models::auth::Role;
use shared_utils::jwt::issue_token;

use crate::models::{AdminCreation, UserError, UserRecord, USERS_COLLECTION};
use crate::services::password::PasswordService;

pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

fn required(value: Option<&str>) -> Result<&str, UserError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(UserError::MissingCredentials),
    }
}

impl UserService {
    pub fn new(state: &AppState) -> Self {
        Self::with_store(state.store.clone())
    }

    pub fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserError> {
        let found = self.store
            .find_one(USERS_COLLECTION, "username", &json!(username))
            .await?;

        match found {
            Some(document) => Ok(Some(serde_json::from_value(Value::Object(document))?)),
            None => Ok(None),
        }
    }

    async fn insert_user(&self, username: &str, password: &str, role: Role) -> Result<DocumentId, UserError> {
        let hash = PasswordService::hash_password(password)
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let record = UserRecord {
            id: String::new(),
            username: username.to_string(),
            password: hash,
            role,
            created_at: Some(Utc::now()),
        };

        let document: Document = match serde_json::to_value(&record)? {
            Value::Object(map) => map,
            _ => Document::new(),
        };

        Ok(self.store.insert(USERS_COLLECTION, document).await?)
    }

    /// Self-service sign-up; always creates a non-admin account.
    pub async fn register(&self, username: Option<&str>, password: Option<&str>) -> Result<DocumentId, UserError> {
        let username = required(username)?;
        let password = required(password)?;
        debug!("Registering user: {}", username);

        if self.find_by_username(username).await?.is_some() {
            return Err(UserError::UsernameTaken(username.to_string()));
        }

        let id = self.insert_user(username, password, Role::User).await?;
        info!("User {} registered with id {}", username, id);
        Ok(id)
    }

    pub async fn authenticate(&self, username: Option<&str>, password: Option<&str>) -> Result<UserRecord, UserError> {
        let username = required(username)?;
        let password = required(password)?;
        debug!("Authenticating user: {}", username);

        let user = self.find_by_username(username)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let valid = PasswordService::verify_password(password, &user.password)
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        if !valid {
            warn!("Failed login for user: {}", username);
            return Err(UserError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Verifies credentials and returns a signed bearer token.
    pub async fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
        jwt_secret: &str,
        ttl_hours: i64,
    ) -> Result<String, UserError> {
        let user = self.authenticate(username, password).await?;
        issue_token(&user.id, &user.username, user.role, jwt_secret, ttl_hours)
            .map_err(UserError::Token)
    }

    /// Idempotent: an existing username is reported, never overwritten.
    pub async fn create_admin(&self, username: &str, password: &str) -> Result<AdminCreation, UserError> {
        let username = required(Some(username))?;
        let password = required(Some(password))?;

        match self.find_by_username(username).await? {
            Some(existing) if existing.role == Role::Admin => {
                info!("Admin '{}' already exists, nothing to do", username);
                return Ok(AdminCreation::AlreadyExists);
            }
            Some(_) => {
                warn!("Username '{}' belongs to a non-admin account, nothing to do", username);
                return Ok(AdminCreation::UsernameTaken);
            }
            None => {}
        }

        let id = self.insert_user(username, password, Role::Admin).await?;
        info!("Admin '{}' created with id {}", username, id);
        Ok(AdminCreation::Created(id.to_string()))
    }

    /// Deletes an admin account unless it would leave the system without one.
    /// Returns whether an admin with that username was removed.
    pub async fn delete_admin(&self, username: &str) -> Result<bool, UserError> {
        let admins = self.store
            .count(USERS_COLLECTION, "role", &json!(Role::Admin.as_str()))
            .await?;
        if admins <= 1 {
            return Err(UserError::LastAdmin);
        }

        let user = match self.find_by_username(username).await? {
            Some(user) if user.role == Role::Admin => user,
            _ => return Ok(false),
        };

        let id = DocumentId::parse(&user.id)?;
        let deleted = self.store.delete(USERS_COLLECTION, &id).await?;
        if deleted {
            info!("Admin '{}' deleted", username);
        }
        Ok(deleted)
    }
}
