//! Admin user management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    middleware::{AuthUser, require_admin},
};
use gaurakshak_db::{UserRepository, repositories::UserError};

/// Creates the user management routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/pending", get(list_pending))
        .route("/users/{id}/approve", post(approve_user))
}

/// Request body for approving a user.
#[derive(Debug, Deserialize)]
pub struct ApproveUserRequest {
    /// Customer ID assigned by the admin.
    pub customer_id: String,
    /// AMC validity end date.
    pub validity_date: NaiveDate,
}

/// GET /users - List all users (admin).
async fn list_users(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list().await {
        Ok(users) => (StatusCode::OK, Json(json!({ "users": users }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list users");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": "An error occurred" })),
            )
                .into_response()
        }
    }
}

/// GET /users/pending - List users awaiting approval (admin).
async fn list_pending(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo.list_pending().await {
        Ok(users) => (StatusCode::OK, Json(json!({ "users": users }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list pending users");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": "An error occurred" })),
            )
                .into_response()
        }
    }
}

/// POST /users/{id}/approve - Approve a pending user (admin).
async fn approve_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveUserRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = UserRepository::new((*state.db).clone());
    match repo
        .approve(id, &payload.customer_id, payload.validity_date)
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, customer_id = ?user.customer_id, "User approved");
            (StatusCode::OK, Json(json!({ "user": user }))).into_response()
        }
        Err(UserError::NotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_found", "message": "User not found" })),
        )
            .into_response(),
        Err(UserError::Approval(e)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "approval_rejected", "message": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to approve user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": "An error occurred" })),
            )
                .into_response()
        }
    }
}
