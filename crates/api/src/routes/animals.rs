//! Animal roster routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use gaurakshak_db::repositories::{
    AnimalError, AnimalRepository, CreateAnimalInput, UpdateAnimalInput,
};

/// Creates the animal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/animals", get(list_animals))
        .route("/animals", post(create_animal))
        .route("/animals/{id}", get(get_animal))
        .route("/animals/{id}", put(update_animal))
        .route("/animals/{id}", delete(delete_animal))
}

/// Request body for registering an animal.
#[derive(Debug, Deserialize)]
pub struct CreateAnimalRequest {
    /// Species label.
    #[serde(rename = "type")]
    pub species: String,
    /// Government tag number, unique per owner.
    pub govt_tag_no: String,
    /// Breed.
    pub breed: String,
    /// Body color.
    pub color: String,
    /// Gender: Male or Female.
    pub gender: String,
    /// Calendar year of birth.
    pub year_of_birth: i32,
    /// Health status: Healthy, Sick, or Under Treatment.
    pub health_status: String,
    /// Ear-tag color.
    pub tag_color: String,
    /// Distinguishing mark.
    pub identification_mark: Option<String>,
    /// Photo URL.
    pub image_url: Option<String>,
}

/// Request body for updating an animal.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateAnimalRequest {
    /// Species label.
    #[serde(rename = "type")]
    pub species: Option<String>,
    /// Government tag number.
    pub govt_tag_no: Option<String>,
    /// Breed.
    pub breed: Option<String>,
    /// Body color.
    pub color: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// Calendar year of birth.
    pub year_of_birth: Option<i32>,
    /// Health status.
    pub health_status: Option<String>,
    /// Ear-tag color.
    pub tag_color: Option<String>,
    /// Distinguishing mark.
    pub identification_mark: Option<String>,
    /// Photo URL.
    pub image_url: Option<String>,
}

fn map_error(e: &AnimalError) -> axum::response::Response {
    let (status, code) = match e {
        AnimalError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        AnimalError::DuplicateTag(_) => (StatusCode::CONFLICT, "duplicate_tag"),
        AnimalError::UnknownGender(_) => (StatusCode::BAD_REQUEST, "invalid_gender"),
        AnimalError::UnknownHealthStatus(_) => (StatusCode::BAD_REQUEST, "invalid_health_status"),
        AnimalError::HasMovements(_) => (StatusCode::UNPROCESSABLE_ENTITY, "has_movements"),
        AnimalError::Database(_) => {
            error!(error = %e, "Animal operation failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": "An error occurred" })),
            )
                .into_response();
        }
    };
    (
        status,
        Json(json!({ "error": code, "message": e.to_string() })),
    )
        .into_response()
}

/// GET /animals - List the caller's roster.
async fn list_animals(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = AnimalRepository::new((*state.db).clone());
    match repo.list(auth.user_id()).await {
        Ok(animals) => (StatusCode::OK, Json(json!({ "animals": animals }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// POST /animals - Register an animal.
async fn create_animal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAnimalRequest>,
) -> impl IntoResponse {
    let repo = AnimalRepository::new((*state.db).clone());
    let input = CreateAnimalInput {
        species: payload.species,
        govt_tag_no: payload.govt_tag_no,
        breed: payload.breed,
        color: payload.color,
        gender: payload.gender,
        year_of_birth: payload.year_of_birth,
        health_status: payload.health_status,
        tag_color: payload.tag_color,
        identification_mark: payload.identification_mark,
        image_url: payload.image_url,
    };

    match repo.create(auth.user_id(), input).await {
        Ok(animal) => {
            info!(animal_id = %animal.id, tag = %animal.govt_tag_no, "Animal registered");
            (StatusCode::CREATED, Json(json!({ "animal": animal }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// GET /animals/{id} - Fetch one animal.
async fn get_animal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AnimalRepository::new((*state.db).clone());
    match repo.find_by_id(auth.user_id(), id).await {
        Ok(Some(animal)) => (StatusCode::OK, Json(json!({ "animal": animal }))).into_response(),
        Ok(None) => map_error(&AnimalError::NotFound(id)),
        Err(e) => map_error(&e),
    }
}

/// PUT /animals/{id} - Update an animal.
async fn update_animal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAnimalRequest>,
) -> impl IntoResponse {
    let repo = AnimalRepository::new((*state.db).clone());
    let input = UpdateAnimalInput {
        species: payload.species,
        govt_tag_no: payload.govt_tag_no,
        breed: payload.breed,
        color: payload.color,
        gender: payload.gender,
        year_of_birth: payload.year_of_birth,
        health_status: payload.health_status,
        tag_color: payload.tag_color,
        identification_mark: payload.identification_mark.map(Some),
        image_url: payload.image_url.map(Some),
    };

    match repo.update(auth.user_id(), id, input).await {
        Ok(animal) => (StatusCode::OK, Json(json!({ "animal": animal }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// DELETE /animals/{id} - Delete an animal with no movement history.
async fn delete_animal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AnimalRepository::new((*state.db).clone());
    match repo.delete(auth.user_id(), id).await {
        Ok(()) => {
            info!(animal_id = %id, "Animal deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_error(&e),
    }
}
