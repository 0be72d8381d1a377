//! AMC renewal routes.
//!
//! Members submit annual maintenance charge payments; admins review the
//! pending queue and approve them, which re-activates the member.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    middleware::{AuthUser, require_admin},
};
use gaurakshak_db::RenewalRepository;
use gaurakshak_db::repositories::{RenewalError, SubmitRenewalInput};

/// Creates the AMC renewal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/amc/renewals", get(list_renewals))
        .route("/amc/renewals", post(submit_renewal))
        .route("/amc/renewals/pending", get(list_pending))
        .route("/amc/renewals/{id}/approve", post(approve_renewal))
}

/// Request body for submitting a renewal payment.
#[derive(Debug, Deserialize)]
pub struct SubmitRenewalRequest {
    /// Payment day.
    pub date: NaiveDate,
    /// Amount paid.
    pub amount: Decimal,
    /// Payment method: RTGS, NEFT, UPI, Cash, or Other.
    pub payment_method: String,
}

/// Request body for approving a renewal.
#[derive(Debug, Deserialize)]
pub struct ApproveRenewalRequest {
    /// New membership validity date.
    pub validity_date: NaiveDate,
}

fn map_error(e: &RenewalError) -> axum::response::Response {
    let (status, code) = match e {
        RenewalError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        RenewalError::UserNotFound(_) => (StatusCode::BAD_REQUEST, "user_not_found"),
        RenewalError::UnknownPaymentMethod(_) => {
            (StatusCode::BAD_REQUEST, "invalid_payment_method")
        }
        RenewalError::NonPositiveAmount => (StatusCode::BAD_REQUEST, "invalid_amount"),
        RenewalError::Approval(_) => (StatusCode::UNPROCESSABLE_ENTITY, "approval_rejected"),
        RenewalError::CorruptStatus(_) | RenewalError::Database(_) => {
            error!(error = %e, "Renewal operation failed");
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

/// GET /amc/renewals - The caller's own renewals, newest first.
async fn list_renewals(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = RenewalRepository::new((*state.db).clone());
    match repo.list_for_user(auth.user_id()).await {
        Ok(renewals) => (StatusCode::OK, Json(json!({ "renewals": renewals }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// POST /amc/renewals - Submit a renewal payment for review.
async fn submit_renewal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<SubmitRenewalRequest>,
) -> impl IntoResponse {
    let repo = RenewalRepository::new((*state.db).clone());
    let input = SubmitRenewalInput {
        date: payload.date,
        amount: payload.amount,
        payment_method: payload.payment_method,
    };

    match repo.submit(auth.user_id(), input).await {
        Ok(renewal) => {
            info!(renewal_id = %renewal.id, user_id = %renewal.user_id, "Renewal submitted");
            (StatusCode::CREATED, Json(json!({ "renewal": renewal }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// GET /amc/renewals/pending - Admin queue of pending renewals.
async fn list_pending(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = RenewalRepository::new((*state.db).clone());
    match repo.list_pending().await {
        Ok(renewals) => (StatusCode::OK, Json(json!({ "renewals": renewals }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// POST /amc/renewals/{id}/approve - Approve a renewal and re-activate the
/// member.
async fn approve_renewal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveRenewalRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_admin(&auth) {
        return response;
    }

    let repo = RenewalRepository::new((*state.db).clone());
    match repo.approve(id, payload.validity_date).await {
        Ok(renewal) => {
            info!(renewal_id = %renewal.id, user_id = %renewal.user_id, "Renewal approved");
            (StatusCode::OK, Json(json!({ "renewal": renewal }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}
