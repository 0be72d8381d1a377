//! Milk production and milk sale routes.

use axum::{
    Json, Router,
    extract::{Query, State},
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

use crate::{AppState, middleware::AuthUser};
use gaurakshak_db::repositories::{
    CreateProductionInput, FinanceError, FinanceRepository, MilkError, MilkRepository,
    MilkSaleInput, ProductionEntry,
};

/// Creates the milk routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/milk/records", get(list_production))
        .route("/milk/records", post(create_production))
        .route("/milk/sales", post(create_sale))
}

/// Query parameters for listing production entries.
#[derive(Debug, Deserialize)]
pub struct ListProductionQuery {
    /// Start day (inclusive).
    pub from: Option<NaiveDate>,
    /// End day (inclusive).
    pub to: Option<NaiveDate>,
}

/// One production entry in a bulk request.
#[derive(Debug, Deserialize)]
pub struct ProductionEntryRequest {
    /// The animal milked.
    pub animal_id: Uuid,
    /// Liters produced.
    pub quantity: Decimal,
}

/// Request body for a bulk production write.
#[derive(Debug, Deserialize)]
pub struct CreateProductionRequest {
    /// Calendar day.
    pub date: NaiveDate,
    /// Session: Morning or Evening.
    pub session: String,
    /// Per-animal quantities.
    pub entries: Vec<ProductionEntryRequest>,
}

/// Request body for a milk sale.
#[derive(Debug, Deserialize)]
pub struct MilkSaleRequest {
    /// Buying customer account; omit for the cash customer.
    pub customer_id: Option<Uuid>,
    /// Liters sold.
    pub quantity: Decimal,
    /// Price per liter.
    pub rate: Decimal,
    /// Invoice number.
    pub invoice_no: String,
    /// Calendar day of the sale.
    pub date: NaiveDate,
}

fn map_milk_error(e: &MilkError) -> axum::response::Response {
    let (status, code) = match e {
        MilkError::AnimalNotFound(_) => (StatusCode::BAD_REQUEST, "animal_not_found"),
        MilkError::NonPositiveQuantity => (StatusCode::BAD_REQUEST, "invalid_quantity"),
        MilkError::UnknownSession(_) => (StatusCode::BAD_REQUEST, "invalid_session"),
        MilkError::EmptyBatch => (StatusCode::BAD_REQUEST, "empty_batch"),
        MilkError::Database(_) => {
            error!(error = %e, "Milk operation failed");
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

/// GET /milk/records - List production entries, newest first.
async fn list_production(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListProductionQuery>,
) -> impl IntoResponse {
    let repo = MilkRepository::new((*state.db).clone());
    match repo.list(auth.user_id(), query.from, query.to).await {
        Ok(records) => (StatusCode::OK, Json(json!({ "records": records }))).into_response(),
        Err(e) => map_milk_error(&e),
    }
}

/// POST /milk/records - Write a session's production entries atomically.
async fn create_production(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateProductionRequest>,
) -> impl IntoResponse {
    let repo = MilkRepository::new((*state.db).clone());
    let input = CreateProductionInput {
        date: payload.date,
        session: payload.session,
        entries: payload
            .entries
            .into_iter()
            .map(|e| ProductionEntry {
                animal_id: e.animal_id,
                quantity: e.quantity,
            })
            .collect(),
    };

    match repo.create_bulk(auth.user_id(), input).await {
        Ok(records) => {
            info!(count = records.len(), "Milk production recorded");
            (StatusCode::CREATED, Json(json!({ "records": records }))).into_response()
        }
        Err(e) => map_milk_error(&e),
    }
}

/// POST /milk/sales - Post a milk sale as a financial record.
async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<MilkSaleRequest>,
) -> impl IntoResponse {
    let repo = FinanceRepository::new((*state.db).clone());
    let input = MilkSaleInput {
        customer_id: payload.customer_id,
        quantity: payload.quantity,
        rate: payload.rate,
        invoice_no: payload.invoice_no,
        date: payload.date,
    };

    match repo.create_milk_sale(auth.user_id(), input).await {
        Ok(record) => {
            info!(record_id = %record.id, "Milk sale recorded");
            (StatusCode::CREATED, Json(json!({ "record": record }))).into_response()
        }
        Err(e @ FinanceError::AccountNotFound(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "customer_not_found", "message": e.to_string() })),
        )
            .into_response(),
        Err(e @ FinanceError::NonPositiveAmount) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_amount", "message": e.to_string() })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to record milk sale");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": "An error occurred" })),
            )
                .into_response()
        }
    }
}
