//! Animal repository with the duplicate-tag pre-check.
//!
//! Government tag numbers are unique per owner. The pre-check races with the
//! schema's unique constraint, which backstops it.

use gaurakshak_core::herd::{Gender, HealthStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{animals, movements};

/// Error types for animal operations.
#[derive(Debug, thiserror::Error)]
pub enum AnimalError {
    /// Animal not found for this owner.
    #[error("animal not found: {0}")]
    NotFound(Uuid),

    /// Another animal of this owner already wears the tag.
    #[error("tag number '{0}' is already registered")]
    DuplicateTag(String),

    /// The gender string is not one of the known values.
    #[error("unknown gender '{0}'")]
    UnknownGender(String),

    /// The health status string is not one of the known values.
    #[error("unknown health status '{0}'")]
    UnknownHealthStatus(String),

    /// Animals with movement history cannot be deleted.
    #[error("animal has {0} movement(s) and cannot be deleted")]
    HasMovements(u64),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering an animal.
#[derive(Debug, Clone)]
pub struct CreateAnimalInput {
    /// Species label (Cow, Bull, Calf, ...).
    pub species: String,
    /// Government tag number, unique per owner.
    pub govt_tag_no: String,
    /// Breed.
    pub breed: String,
    /// Body color.
    pub color: String,
    /// Stored gender string.
    pub gender: String,
    /// Calendar year of birth.
    pub year_of_birth: i32,
    /// Stored health status string.
    pub health_status: String,
    /// Ear-tag color.
    pub tag_color: String,
    /// Distinguishing mark.
    pub identification_mark: Option<String>,
    /// Photo URL.
    pub image_url: Option<String>,
}

/// Input for updating an animal; absent fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAnimalInput {
    /// New species label.
    pub species: Option<String>,
    /// New tag number (re-checked for uniqueness).
    pub govt_tag_no: Option<String>,
    /// New breed.
    pub breed: Option<String>,
    /// New color.
    pub color: Option<String>,
    /// New stored gender string.
    pub gender: Option<String>,
    /// New year of birth.
    pub year_of_birth: Option<i32>,
    /// New stored health status string.
    pub health_status: Option<String>,
    /// New tag color.
    pub tag_color: Option<String>,
    /// New identification mark.
    pub identification_mark: Option<Option<String>>,
    /// New image URL.
    pub image_url: Option<Option<String>>,
}

/// Animal repository for roster CRUD.
#[derive(Debug, Clone)]
pub struct AnimalRepository {
    db: DatabaseConnection,
}

impl AnimalRepository {
    /// Creates a new animal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers an animal after checking the tag is free.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is taken or an enum string fails to
    /// parse.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: CreateAnimalInput,
    ) -> Result<animals::Model, AnimalError> {
        if Gender::parse(&input.gender).is_none() {
            return Err(AnimalError::UnknownGender(input.gender));
        }
        if HealthStatus::parse(&input.health_status).is_none() {
            return Err(AnimalError::UnknownHealthStatus(input.health_status));
        }
        if self.tag_exists(owner_id, &input.govt_tag_no, None).await? {
            return Err(AnimalError::DuplicateTag(input.govt_tag_no));
        }

        let now = chrono::Utc::now().into();
        let animal = animals::ActiveModel {
            id: Set(Uuid::new_v4()),
            owner_id: Set(owner_id),
            species: Set(input.species),
            govt_tag_no: Set(input.govt_tag_no),
            breed: Set(input.breed),
            color: Set(input.color),
            gender: Set(input.gender),
            year_of_birth: Set(input.year_of_birth),
            health_status: Set(input.health_status),
            tag_color: Set(input.tag_color),
            identification_mark: Set(input.identification_mark),
            image_url: Set(input.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(animal.insert(&self.db).await?)
    }

    /// Lists the owner's roster sorted by tag number.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<animals::Model>, AnimalError> {
        Ok(animals::Entity::find()
            .filter(animals::Column::OwnerId.eq(owner_id))
            .order_by_asc(animals::Column::GovtTagNo)
            .all(&self.db)
            .await?)
    }

    /// Finds one of the owner's animals by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Option<animals::Model>, AnimalError> {
        Ok(animals::Entity::find_by_id(id)
            .filter(animals::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?)
    }

    /// Updates an animal, re-checking tag uniqueness when it changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the animal is missing, the new tag is taken, or
    /// an enum string fails to parse.
    pub async fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        input: UpdateAnimalInput,
    ) -> Result<animals::Model, AnimalError> {
        let animal = self
            .find_by_id(owner_id, id)
            .await?
            .ok_or(AnimalError::NotFound(id))?;

        if let Some(gender) = &input.gender
            && Gender::parse(gender).is_none()
        {
            return Err(AnimalError::UnknownGender(gender.clone()));
        }
        if let Some(health) = &input.health_status
            && HealthStatus::parse(health).is_none()
        {
            return Err(AnimalError::UnknownHealthStatus(health.clone()));
        }
        if let Some(new_tag) = &input.govt_tag_no
            && *new_tag != animal.govt_tag_no
            && self.tag_exists(owner_id, new_tag, Some(id)).await?
        {
            return Err(AnimalError::DuplicateTag(new_tag.clone()));
        }

        let mut active: animals::ActiveModel = animal.into();
        if let Some(species) = input.species {
            active.species = Set(species);
        }
        if let Some(govt_tag_no) = input.govt_tag_no {
            active.govt_tag_no = Set(govt_tag_no);
        }
        if let Some(breed) = input.breed {
            active.breed = Set(breed);
        }
        if let Some(color) = input.color {
            active.color = Set(color);
        }
        if let Some(gender) = input.gender {
            active.gender = Set(gender);
        }
        if let Some(year_of_birth) = input.year_of_birth {
            active.year_of_birth = Set(year_of_birth);
        }
        if let Some(health_status) = input.health_status {
            active.health_status = Set(health_status);
        }
        if let Some(tag_color) = input.tag_color {
            active.tag_color = Set(tag_color);
        }
        if let Some(identification_mark) = input.identification_mark {
            active.identification_mark = Set(identification_mark);
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(image_url);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(&self.db).await?)
    }

    /// Deletes an animal that has no movement history.
    ///
    /// # Errors
    ///
    /// Returns an error if the animal is missing or has movements.
    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), AnimalError> {
        let animal = self
            .find_by_id(owner_id, id)
            .await?
            .ok_or(AnimalError::NotFound(id))?;

        let movement_count = movements::Entity::find()
            .filter(movements::Column::AnimalId.eq(id))
            .count(&self.db)
            .await?;
        if movement_count > 0 {
            return Err(AnimalError::HasMovements(movement_count));
        }

        animal.delete(&self.db).await?;
        Ok(())
    }

    async fn tag_exists(
        &self,
        owner_id: Uuid,
        tag: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AnimalError> {
        let mut query = animals::Entity::find()
            .filter(animals::Column::OwnerId.eq(owner_id))
            .filter(animals::Column::GovtTagNo.eq(tag));
        if let Some(id) = exclude {
            query = query.filter(animals::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }
}
