//! Account repository for the owner's chart of customers, banks, and expense
//! heads.
//!
//! Deleting an account does not cascade to financial records; existing
//! ledger rows keep their `account_id` and simply stop resolving.

use gaurakshak_core::ledger::AccountType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found for this owner.
    #[error("account not found: {0}")]
    NotFound(Uuid),

    /// The account type string is not one of the known types.
    #[error("unknown account type '{0}'")]
    UnknownType(String),

    /// The account name is empty.
    #[error("account name must not be empty")]
    EmptyName,

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account name.
    pub name: String,
    /// Stored account type string (Customer, Bank, Expense).
    pub account_type: String,
}

/// Input for updating an account.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    /// New account name.
    pub name: Option<String>,
    /// New account type string.
    pub account_type: Option<String>,
}

/// Account repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account for the owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the type is unknown.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AccountError::EmptyName);
        }
        if AccountType::parse(&input.account_type).is_none() {
            return Err(AccountError::UnknownType(input.account_type));
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            name: Set(name.to_string()),
            account_type: Set(input.account_type),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(account.insert(&self.db).await?)
    }

    /// Lists the owner's accounts sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Finds one of the owner's accounts by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<accounts::Model>, AccountError> {
        Ok(accounts::Entity::find_by_id(id)
            .filter(accounts::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?)
    }

    /// Updates an account's name or type.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the new type is unknown.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        input: UpdateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        let account = self
            .find_by_id(owner_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;

        if let Some(account_type) = &input.account_type
            && AccountType::parse(account_type).is_none()
        {
            return Err(AccountError::UnknownType(account_type.clone()));
        }

        let mut active: accounts::ActiveModel = account.into();
        if let Some(name) = input.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(AccountError::EmptyName);
            }
            active.name = Set(name);
        }
        if let Some(account_type) = input.account_type {
            active.account_type = Set(account_type);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an account. Financial records referencing it are untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is missing or the delete fails.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AccountError> {
        let account = self
            .find_by_id(owner_id, id)
            .await?
            .ok_or(AccountError::NotFound(id))?;
        account.delete(&self.db).await?;
        Ok(())
    }
}
