//! AMC renewal repository.
//!
//! Approval flips the renewal to Approved and re-activates the submitting
//! user with the new validity date in one database transaction.

use chrono::NaiveDate;
use gaurakshak_core::approval::{self, ApprovalError, RenewalStatus};
use gaurakshak_core::ledger::PaymentMethod;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{amc_renewals, users};

/// Error types for AMC renewal operations.
#[derive(Debug, thiserror::Error)]
pub enum RenewalError {
    /// Renewal not found.
    #[error("renewal not found: {0}")]
    NotFound(Uuid),

    /// Submitting or renewed user not found.
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    /// The payment method string is not one of the known methods.
    #[error("unknown payment method '{0}'")]
    UnknownPaymentMethod(String),

    /// Amounts must be strictly positive.
    #[error("amount must be positive")]
    NonPositiveAmount,

    /// A stored status string failed to parse.
    #[error("stored renewal status '{0}' is invalid")]
    CorruptStatus(String),

    /// An approval transition was rejected.
    #[error(transparent)]
    Approval(#[from] ApprovalError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError<Self>> for RenewalError {
    fn from(err: TransactionError<Self>) -> Self {
        match err {
            TransactionError::Connection(db) => Self::Database(db),
            TransactionError::Transaction(inner) => inner,
        }
    }
}

/// Input for submitting a renewal.
#[derive(Debug, Clone)]
pub struct SubmitRenewalInput {
    /// Payment day.
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Stored payment method string.
    pub payment_method: String,
}

/// AMC renewal repository.
#[derive(Debug, Clone)]
pub struct RenewalRepository {
    db: DatabaseConnection,
}

impl RenewalRepository {
    /// Creates a new renewal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Submits a renewal in `Pending` status for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is missing or the input fails
    /// validation.
    pub async fn submit(
        &self,
        user_id: Uuid,
        input: SubmitRenewalInput,
    ) -> Result<amc_renewals::Model, RenewalError> {
        if input.amount <= Decimal::ZERO {
            return Err(RenewalError::NonPositiveAmount);
        }
        if PaymentMethod::parse(&input.payment_method).is_none() {
            return Err(RenewalError::UnknownPaymentMethod(input.payment_method));
        }

        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(RenewalError::UserNotFound(user_id))?;

        let now = chrono::Utc::now().into();
        let renewal = amc_renewals::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            user_name: Set(user.name),
            customer_id: Set(user.customer_id),
            date: Set(input.date),
            amount: Set(input.amount),
            payment_method: Set(input.payment_method),
            status: Set(RenewalStatus::Pending.as_str().to_string()),
            submitted_at: Set(now),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(renewal.insert(&self.db).await?)
    }

    /// Lists pending renewals, oldest submission first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_pending(&self) -> Result<Vec<amc_renewals::Model>, RenewalError> {
        Ok(amc_renewals::Entity::find()
            .filter(amc_renewals::Column::Status.eq(RenewalStatus::Pending.as_str()))
            .order_by_asc(amc_renewals::Column::SubmittedAt)
            .all(&self.db)
            .await?)
    }

    /// Lists a user's own renewals, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<amc_renewals::Model>, RenewalError> {
        Ok(amc_renewals::Entity::find()
            .filter(amc_renewals::Column::UserId.eq(user_id))
            .order_by_desc(amc_renewals::Column::SubmittedAt)
            .all(&self.db)
            .await?)
    }

    /// Approves a pending renewal: the renewal flips to Approved and the
    /// user becomes Active with the new validity date, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the renewal or user is missing or the renewal is
    /// not pending.
    pub async fn approve(
        &self,
        id: Uuid,
        new_validity_date: NaiveDate,
    ) -> Result<amc_renewals::Model, RenewalError> {
        let renewal = amc_renewals::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(RenewalError::NotFound(id))?;

        let status = RenewalStatus::parse(&renewal.status)
            .ok_or_else(|| RenewalError::CorruptStatus(renewal.status.clone()))?;
        let transition = approval::approve_renewal(status, new_validity_date)?;

        let updated = self
            .db
            .transaction::<_, amc_renewals::Model, RenewalError>(move |txn| {
                Box::pin(async move {
                    let user = users::Entity::find_by_id(renewal.user_id)
                        .one(txn)
                        .await?
                        .ok_or(RenewalError::UserNotFound(renewal.user_id))?;

                    let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();

                    let mut user_active: users::ActiveModel = user.into();
                    user_active.status = Set(transition.user_status.as_str().to_string());
                    user_active.validity_date = Set(Some(transition.validity_date));
                    user_active.updated_at = Set(now);
                    user_active.update(txn).await?;

                    let mut renewal_active: amc_renewals::ActiveModel = renewal.into();
                    renewal_active.status =
                        Set(transition.renewal_status.as_str().to_string());
                    renewal_active.updated_at = Set(now);
                    Ok(renewal_active.update(txn).await?)
                })
            })
            .await?;
        Ok(updated)
    }
}
