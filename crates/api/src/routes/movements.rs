//! Movement log routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use gaurakshak_db::repositories::{
    CreateMovementInput, MovementError, MovementRepository, UpdateMovementInput,
};

/// Creates the movement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/movements", get(list_movements))
        .route("/movements", post(create_movement))
        .route("/movements/{id}", patch(update_movement))
        .route("/movements/{id}", delete(delete_movement))
}

/// Request body for recording a movement.
#[derive(Debug, Deserialize)]
pub struct CreateMovementRequest {
    /// The animal moving.
    pub animal_id: Uuid,
    /// Kind: Entry or Exit.
    #[serde(rename = "type")]
    pub kind: String,
    /// Calendar day of the movement.
    pub date: NaiveDate,
    /// Why the animal moved.
    pub reason: String,
}

/// Request body for correcting a movement.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateMovementRequest {
    /// New day.
    pub date: Option<NaiveDate>,
    /// New reason.
    pub reason: Option<String>,
}

fn map_error(e: &MovementError) -> axum::response::Response {
    let (status, code) = match e {
        MovementError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        MovementError::AnimalNotFound(_) => (StatusCode::BAD_REQUEST, "animal_not_found"),
        MovementError::UnknownKind(_) => (StatusCode::BAD_REQUEST, "invalid_kind"),
        MovementError::EmptyReason => (StatusCode::BAD_REQUEST, "empty_reason"),
        MovementError::AlreadyPresent | MovementError::NotPresent => {
            (StatusCode::UNPROCESSABLE_ENTITY, "alternation_violation")
        }
        MovementError::Database(_) => {
            error!(error = %e, "Movement operation failed");
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

/// GET /movements - List the caller's movement log, oldest first.
async fn list_movements(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    match repo.list(auth.user_id()).await {
        Ok(movements) => {
            (StatusCode::OK, Json(json!({ "movements": movements }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// POST /movements - Record a movement after the alternation check.
async fn create_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateMovementRequest>,
) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    let input = CreateMovementInput {
        animal_id: payload.animal_id,
        kind: payload.kind,
        date: payload.date,
        reason: payload.reason,
    };

    match repo.create(auth.user_id(), input).await {
        Ok(movement) => {
            info!(movement_id = %movement.id, animal_id = %movement.animal_id, "Movement recorded");
            (StatusCode::CREATED, Json(json!({ "movement": movement }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// PATCH /movements/{id} - Correct a movement's day or reason.
async fn update_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovementRequest>,
) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    let input = UpdateMovementInput {
        date: payload.date,
        reason: payload.reason,
    };

    match repo.update(auth.user_id(), id, input).await {
        Ok(movement) => (StatusCode::OK, Json(json!({ "movement": movement }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// DELETE /movements/{id} - Delete a movement.
async fn delete_movement(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MovementRepository::new((*state.db).clone());
    match repo.delete(auth.user_id(), id).await {
        Ok(()) => {
            info!(movement_id = %id, "Movement deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_error(&e),
    }
}
