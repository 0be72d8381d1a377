//! Financial record and bank transfer routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use gaurakshak_db::repositories::{
    CreateRecordInput, FinanceError, FinanceRepository, TransferInput, UpdateRecordInput,
};

/// Creates the finance routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/finance/records", get(list_records))
        .route("/finance/records", post(create_record))
        .route("/finance/records/{id}", patch(update_record))
        .route("/finance/records/{id}", delete(delete_record))
        .route("/finance/transfers", post(create_transfer))
}

/// Query parameters for listing records.
#[derive(Debug, Deserialize)]
pub struct ListRecordsQuery {
    /// Start day (inclusive).
    pub from: Option<NaiveDate>,
    /// End day (inclusive).
    pub to: Option<NaiveDate>,
}

/// Request body for creating a record.
#[derive(Debug, Deserialize)]
pub struct CreateRecordRequest {
    /// Calendar day.
    pub date: NaiveDate,
    /// Record type: Receipt, Payment, Expense, Milk Sale, or Bank Record.
    #[serde(rename = "type")]
    pub record_type: String,
    /// Positive amount.
    pub amount: Decimal,
    /// Narrative.
    pub description: String,
    /// Account the record posts to.
    pub account_id: Option<Uuid>,
    /// Payment method: RTGS, NEFT, UPI, Cash, or Other.
    pub payment_method: Option<String>,
}

/// Request body for updating a record.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateRecordRequest {
    /// New day.
    pub date: Option<NaiveDate>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New narrative.
    pub description: Option<String>,
    /// New payment method.
    pub payment_method: Option<String>,
}

/// Request body for a bank transfer.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    /// Source account.
    pub from_account_id: Uuid,
    /// Destination account.
    pub to_account_id: Uuid,
    /// Transferred amount.
    pub amount: Decimal,
    /// Calendar day.
    pub date: NaiveDate,
    /// Narrative appended to both legs.
    pub description: String,
}

fn map_error(e: &FinanceError) -> axum::response::Response {
    let (status, code) = match e {
        FinanceError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        FinanceError::AccountNotFound(_) => (StatusCode::BAD_REQUEST, "account_not_found"),
        FinanceError::NonPositiveAmount => (StatusCode::BAD_REQUEST, "invalid_amount"),
        FinanceError::UnknownKind(_) => (StatusCode::BAD_REQUEST, "invalid_record_type"),
        FinanceError::UnknownPaymentMethod(_) => {
            (StatusCode::BAD_REQUEST, "invalid_payment_method")
        }
        FinanceError::ImmutableRecord => (StatusCode::UNPROCESSABLE_ENTITY, "immutable_record"),
        FinanceError::SameAccount => (StatusCode::BAD_REQUEST, "same_account"),
        FinanceError::Database(_) => {
            error!(error = %e, "Finance operation failed");
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

/// GET /finance/records - List records, oldest first.
async fn list_records(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListRecordsQuery>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new((*state.db).clone());
    match repo.list(auth.user_id(), query.from, query.to).await {
        Ok(records) => (StatusCode::OK, Json(json!({ "records": records }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// POST /finance/records - Create a plain record.
async fn create_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateRecordRequest>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new((*state.db).clone());
    let input = CreateRecordInput {
        date: payload.date,
        record_type: payload.record_type,
        amount: payload.amount,
        description: payload.description,
        account_id: payload.account_id,
        payment_method: payload.payment_method,
    };

    match repo.create(auth.user_id(), input).await {
        Ok(record) => {
            info!(record_id = %record.id, "Financial record created");
            (StatusCode::CREATED, Json(json!({ "record": record }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// PATCH /finance/records/{id} - Update a plain record.
async fn update_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecordRequest>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new((*state.db).clone());
    let input = UpdateRecordInput {
        date: payload.date,
        amount: payload.amount,
        description: payload.description,
        payment_method: payload.payment_method.map(Some),
    };

    match repo.update(auth.user_id(), id, input).await {
        Ok(record) => (StatusCode::OK, Json(json!({ "record": record }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// DELETE /finance/records/{id} - Delete a plain record.
async fn delete_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new((*state.db).clone());
    match repo.delete(auth.user_id(), id).await {
        Ok(()) => {
            info!(record_id = %id, "Financial record deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// POST /finance/transfers - Write both legs of a bank transfer atomically.
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new((*state.db).clone());
    let input = TransferInput {
        from_account_id: payload.from_account_id,
        to_account_id: payload.to_account_id,
        amount: payload.amount,
        date: payload.date,
        description: payload.description,
    };

    match repo.create_transfer(auth.user_id(), input).await {
        Ok(legs) => {
            info!(count = legs.len(), "Bank transfer recorded");
            (StatusCode::CREATED, Json(json!({ "records": legs }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}
