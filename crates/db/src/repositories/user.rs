//! User repository: signup, lookup, and the approval/expiry transitions.

use chrono::NaiveDate;
use gaurakshak_core::approval::{self, ApprovalError, UserStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::users;

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered.
    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    /// User not found.
    #[error("user not found: {0}")]
    NotFound(Uuid),

    /// A stored status string failed to parse.
    #[error("stored user status '{0}' is invalid")]
    CorruptStatus(String),

    /// An approval transition was rejected.
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a user.
#[derive(Debug, Clone)]
pub struct RegisterUserInput {
    /// Login email, normalized before storage.
    pub email: String,
    /// Argon2 password hash, never the raw password.
    pub password_hash: String,
    /// Display name.
    pub name: String,
    /// Postal address.
    pub address: Option<String>,
    /// Contact number.
    pub mobile_no: Option<String>,
}

/// User repository for account lifecycle operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new user in `Pending` status.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmailTaken` if the email is already registered.
    pub async fn register(&self, input: RegisterUserInput) -> Result<users::Model, UserError> {
        let email = normalize_email(&input.email);

        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .count(&self.db)
            .await?;
        if existing > 0 {
            return Err(UserError::EmailTaken(email));
        }

        let now = chrono::Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(input.password_hash),
            name: Set(input.name),
            address: Set(input.address),
            mobile_no: Set(input.mobile_no),
            role: Set(approval::UserRole::User.as_str().to_string()),
            status: Set(UserStatus::Pending.as_str().to_string()),
            customer_id: Set(None),
            validity_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(user.insert(&self.db).await?)
    }

    /// Finds a user by normalized email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await?)
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, UserError> {
        Ok(users::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Lists all users, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<users::Model>, UserError> {
        Ok(users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Lists users awaiting approval, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_pending(&self) -> Result<Vec<users::Model>, UserError> {
        Ok(users::Entity::find()
            .filter(users::Column::Status.eq(UserStatus::Pending.as_str()))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Approves a pending user, assigning a customer ID and AMC validity date.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is missing, is not pending, or the
    /// customer ID is empty.
    pub async fn approve(
        &self,
        id: Uuid,
        customer_id: &str,
        validity_date: NaiveDate,
    ) -> Result<users::Model, UserError> {
        let user = users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let status = UserStatus::parse(&user.status)
            .ok_or_else(|| UserError::CorruptStatus(user.status.clone()))?;
        let transition = approval::approve_user(status, customer_id, validity_date)?;

        let mut active: users::ActiveModel = user.into();
        active.status = Set(transition.status.as_str().to_string());
        active.customer_id = Set(Some(transition.customer_id));
        active.validity_date = Set(Some(transition.validity_date));
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Flips a user to `Expired`. Used when a login finds the validity date
    /// lapsed.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is missing or the update fails.
    pub async fn mark_expired(&self, id: Uuid) -> Result<users::Model, UserError> {
        let user = users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut active: users::ActiveModel = user.into();
        active.status = Set(UserStatus::Expired.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }
}

/// Normalizes an email for storage and lookup: trimmed and lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Gopal@Example.COM "), "gopal@example.com");
        assert_eq!(normalize_email("plain@example.com"), "plain@example.com");
    }
}
