use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db,
    entities::user,
    errors::ServiceError,
    events::{Event, EventSender},
    services::{activity, ensure_unique, merge},
};

const DEFAULT_ROLE: &str = "User";
const DEFAULT_STATUS: &str = "Active";

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<String>,
    pub status: Option<String>,
}

#[derive(Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub username: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
}

// Passwords stay out of logs and spans
impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUser")
            .field("username", &self.username)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Hashes a password with Argon2id and a random salt.
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| ServiceError::HashError(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ServiceError::HashError(e.to_string())
        })
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<String>) -> Result<Vec<user::Model>, ServiceError> {
        let mut select = user::Entity::find();
        if let Some(status) = status {
            select = select.filter(user::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(user::Column::UpdatedAt)
            .order_by_desc(user::Column::CreatedAt)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn create(&self, input: CreateUser) -> Result<user::Model, ServiceError> {
        input.validate()?;
        let username = input.username.trim().to_string();
        let password_hash = hash_password(&input.password)?;

        let txn = db::begin(&self.db).await?;
        ensure_unique(
            &txn,
            user::Entity::find().filter(user::Column::Username.eq(username.as_str())),
            "User",
            &username,
        )
        .await?;

        let now = Utc::now();
        let created = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            name: Set(input.name),
            password_hash: Set(password_hash),
            role: Set(input.role.unwrap_or_else(|| DEFAULT_ROLE.to_string())),
            status: Set(input.status.unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        activity::record(
            &txn,
            "Create User",
            format!("User {} created", created.username),
        )
        .await?;
        db::commit(txn, "user.create").await?;

        info!(username = %created.username, "User created");
        self.event_sender
            .publish(Event::created("user", created.id))
            .await;
        Ok(created)
    }

    /// Applies a partial change; a new password is re-hashed.
    #[instrument(skip(self))]
    pub async fn update(&self, id: Uuid, input: UpdateUser) -> Result<user::Model, ServiceError> {
        input.validate()?;
        let password_hash = input.password.as_deref().map(hash_password).transpose()?;

        let txn = db::begin(&self.db).await?;
        let mut existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

        if let Some(username) = input.username.map(|u| u.trim().to_string()) {
            if username != existing.username {
                ensure_unique(
                    &txn,
                    user::Entity::find()
                        .filter(user::Column::Username.eq(username.as_str()))
                        .filter(user::Column::Id.ne(id)),
                    "User",
                    &username,
                )
                .await?;
            }
            existing.username = username;
        }
        merge(&mut existing.name, input.name);
        merge(&mut existing.password_hash, password_hash);
        merge(&mut existing.role, input.role);
        merge(&mut existing.status, input.status);

        let mut active: user::ActiveModel = existing.into();
        active.updated_at = Set(Utc::now());
        let updated = active.reset_all().update(&txn).await?;

        activity::record(
            &txn,
            "Update User",
            format!("User {} updated", updated.username),
        )
        .await?;
        db::commit(txn, "user.update").await?;

        self.event_sender
            .publish(Event::updated("user", updated.id))
            .await;
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let txn = db::begin(&self.db).await?;
        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", id)))?;

        user::Entity::delete_by_id(id).exec(&txn).await?;
        activity::record(
            &txn,
            "Delete User",
            format!("User {} deleted", existing.username),
        )
        .await?;
        db::commit(txn, "user.delete").await?;

        self.event_sender
            .publish(Event::deleted("user", id, 0))
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{password_hash::PasswordHash, PasswordVerifier};

    #[test]
    fn hashes_verify_and_are_salted() {
        let first = hash_password("extrude42").unwrap();
        let second = hash_password("extrude42").unwrap();
        assert_ne!(first, second);

        let parsed = PasswordHash::new(&first).unwrap();
        assert!(Argon2::default()
            .verify_password(b"extrude42", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"wrong-password", &parsed)
            .is_err());
    }

    #[test]
    fn debug_output_omits_password() {
        let input = CreateUser {
            username: "op1".into(),
            name: "Operator".into(),
            password: "secret-pass".into(),
            role: None,
            status: None,
        };
        assert!(!format!("{:?}", input).contains("secret-pass"));
    }
}
