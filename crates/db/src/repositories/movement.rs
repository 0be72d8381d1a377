//! Movement repository enforcing entry/exit alternation.
//!
//! An Entry is only accepted for an animal currently absent and an Exit only
//! for one currently present, judged by the animal's latest movement.

use chrono::NaiveDate;
use gaurakshak_core::herd::{Movement, MovementKind};
use gaurakshak_core::registry::current_state;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{animals, movements};

/// Error types for movement operations.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// Movement not found for this owner.
    #[error("movement not found: {0}")]
    NotFound(Uuid),

    /// Referenced animal not found for this owner.
    #[error("animal not found: {0}")]
    AnimalNotFound(Uuid),

    /// The kind string is not Entry or Exit.
    #[error("unknown movement kind '{0}'")]
    UnknownKind(String),

    /// Every movement needs a reason.
    #[error("movement reason must not be empty")]
    EmptyReason,

    /// An Entry for an animal that is already inside.
    #[error("animal is already present; record an Exit first")]
    AlreadyPresent,

    /// An Exit for an animal that is not inside.
    #[error("animal is not present; record an Entry first")]
    NotPresent,

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for recording a movement.
#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    /// The animal moving.
    pub animal_id: Uuid,
    /// Stored kind string (Entry or Exit).
    pub kind: String,
    /// Calendar day of the movement.
    pub date: NaiveDate,
    /// Why the animal moved.
    pub reason: String,
}

/// Input for correcting a movement's day or reason. The kind is fixed;
/// changing it would break alternation.
#[derive(Debug, Clone, Default)]
pub struct UpdateMovementInput {
    /// New day.
    pub date: Option<NaiveDate>,
    /// New reason.
    pub reason: Option<String>,
}

/// Movement repository for the entry/exit log.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    db: DatabaseConnection,
}

impl MovementRepository {
    /// Creates a new movement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a movement after the alternation check.
    ///
    /// # Errors
    ///
    /// Returns an error if the animal is missing, the reason is empty, or
    /// the movement violates alternation.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateMovementInput,
    ) -> Result<movements::Model, MovementError> {
        let kind = MovementKind::parse(&input.kind)
            .ok_or_else(|| MovementError::UnknownKind(input.kind.clone()))?;
        if input.reason.trim().is_empty() {
            return Err(MovementError::EmptyReason);
        }

        let animal_exists = animals::Entity::find_by_id(input.animal_id)
            .filter(animals::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .is_some();
        if !animal_exists {
            return Err(MovementError::AnimalNotFound(input.animal_id));
        }

        let log = self.domain_log(input.animal_id).await?;
        let present = current_state(&log, input.animal_id) == Some(MovementKind::Entry);
        match kind {
            MovementKind::Entry if present => return Err(MovementError::AlreadyPresent),
            MovementKind::Exit if !present => return Err(MovementError::NotPresent),
            _ => {}
        }

        let now = chrono::Utc::now().into();
        let movement = movements::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            animal_id: Set(input.animal_id),
            kind: Set(kind.as_str().to_string()),
            date: Set(input.date),
            reason: Set(input.reason),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(movement.insert(&self.db).await?)
    }

    /// Lists the owner's movements in chronological order; insertion order
    /// breaks same-day ties.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<movements::Model>, MovementError> {
        Ok(movements::Entity::find()
            .filter(movements::Column::OwnerId.eq(owner_id))
            .order_by_asc(movements::Column::Date)
            .order_by_asc(movements::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Updates a movement's day or reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing or the new reason is
    /// empty.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        input: UpdateMovementInput,
    ) -> Result<movements::Model, MovementError> {
        let movement = self.find_movement(owner_id, id).await?;

        if let Some(reason) = &input.reason
            && reason.trim().is_empty()
        {
            return Err(MovementError::EmptyReason);
        }

        let mut active: movements::ActiveModel = movement.into();
        if let Some(date) = input.date {
            active.date = Set(date);
        }
        if let Some(reason) = input.reason {
            active.reason = Set(reason);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes a movement.
    ///
    /// # Errors
    ///
    /// Returns an error if the movement is missing or the delete fails.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), MovementError> {
        let movement = self.find_movement(owner_id, id).await?;
        movement.delete(&self.db).await?;
        Ok(())
    }

    async fn find_movement(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<movements::Model, MovementError> {
        movements::Entity::find_by_id(id)
            .filter(movements::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(MovementError::NotFound(id))
    }

    /// Loads an animal's movements as domain values in log order.
    async fn domain_log(&self, animal_id: Uuid) -> Result<Vec<Movement>, MovementError> {
        let rows = movements::Entity::find()
            .filter(movements::Column::AnimalId.eq(animal_id))
            .order_by_asc(movements::Column::Date)
            .order_by_asc(movements::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                MovementKind::parse(&row.kind).map(|kind| Movement {
                    id: row.id,
                    animal_id: row.animal_id,
                    kind,
                    date: row.date,
                    reason: row.reason,
                })
            })
            .collect())
    }
}
