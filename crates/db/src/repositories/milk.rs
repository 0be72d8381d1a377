//! Milk production repository.
//!
//! Daily entry happens per session for the whole milking herd at once, so
//! the bulk insert is atomic: either every animal's entry lands or none do.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{animals, milk_records};

/// Stored session strings.
const SESSIONS: [&str; 2] = ["Morning", "Evening"];

/// Error types for milk production operations.
#[derive(Debug, thiserror::Error)]
pub enum MilkError {
    /// Referenced animal not found for this owner.
    #[error("animal not found: {0}")]
    AnimalNotFound(Uuid),

    /// Quantities must be strictly positive.
    #[error("milk quantity must be positive")]
    NonPositiveQuantity,

    /// The session string is not Morning or Evening.
    #[error("unknown milking session '{0}'")]
    UnknownSession(String),

    /// The bulk request carried no entries.
    #[error("no production entries supplied")]
    EmptyBatch,

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl From<TransactionError<Self>> for MilkError {
    fn from(err: TransactionError<Self>) -> Self {
        match err {
            TransactionError::Connection(db) => Self::Database(db),
            TransactionError::Transaction(inner) => inner,
        }
    }
}

/// One production entry in a bulk write.
#[derive(Debug, Clone)]
pub struct ProductionEntry {
    /// The animal milked.
    pub animal_id: Uuid,
    /// Liters produced.
    pub quantity: Decimal,
}

/// Input for a bulk production write.
#[derive(Debug, Clone)]
pub struct CreateProductionInput {
    /// Calendar day.
    pub date: NaiveDate,
    /// Stored session string (Morning or Evening).
    pub session: String,
    /// Per-animal quantities.
    pub entries: Vec<ProductionEntry>,
}

/// Milk production repository.
#[derive(Debug, Clone)]
pub struct MilkRepository {
    db: DatabaseConnection,
}

impl MilkRepository {
    /// Creates a new milk repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Writes a session's production entries atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty, a quantity is not positive,
    /// the session is unknown, or any animal is missing.
    pub async fn create_bulk(
        &self,
        owner_id: Uuid,
        input: CreateProductionInput,
    ) -> Result<Vec<milk_records::Model>, MilkError> {
        if input.entries.is_empty() {
            return Err(MilkError::EmptyBatch);
        }
        if !SESSIONS.contains(&input.session.as_str()) {
            return Err(MilkError::UnknownSession(input.session));
        }
        if input.entries.iter().any(|e| e.quantity <= Decimal::ZERO) {
            return Err(MilkError::NonPositiveQuantity);
        }

        let mut tags = Vec::with_capacity(input.entries.len());
        for entry in &input.entries {
            let animal = animals::Entity::find_by_id(entry.animal_id)
                .filter(animals::Column::OwnerId.eq(owner_id))
                .one(&self.db)
                .await?
                .ok_or(MilkError::AnimalNotFound(entry.animal_id))?;
            tags.push(animal.govt_tag_no);
        }

        let date = input.date;
        let session = input.session;
        let entries = input.entries;
        let models = self
            .db
            .transaction::<_, Vec<milk_records::Model>, MilkError>(move |txn| {
                Box::pin(async move {
                    let now = chrono::Utc::now().into();
                    let mut inserted = Vec::with_capacity(entries.len());
                    for (entry, tag) in entries.into_iter().zip(tags) {
                        let record = milk_records::ActiveModel {
                            id: Set(Uuid::new_v4()),
                            owner_id: Set(owner_id),
                            animal_id: Set(entry.animal_id),
                            animal_tag: Set(tag),
                            date: Set(date),
                            quantity: Set(entry.quantity),
                            session: Set(session.clone()),
                            created_at: Set(now),
                            updated_at: Set(now),
                        };
                        inserted.push(record.insert(txn).await?);
                    }
                    Ok(inserted)
                })
            })
            .await?;
        Ok(models)
    }

    /// Lists the owner's production entries in a day window, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        owner_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<milk_records::Model>, MilkError> {
        let mut query = milk_records::Entity::find()
            .filter(milk_records::Column::OwnerId.eq(owner_id))
            .order_by_desc(milk_records::Column::Date)
            .order_by_asc(milk_records::Column::AnimalTag);

        if let Some(from) = from {
            query = query.filter(milk_records::Column::Date.gte(from));
        }
        if let Some(to) = to {
            query = query.filter(milk_records::Column::Date.lte(to));
        }

        Ok(query.all(&self.db).await?)
    }
}
