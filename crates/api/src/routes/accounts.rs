//! Account management routes.

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
    AccountError, AccountRepository, CreateAccountInput, UpdateAccountInput,
};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts", post(create_account))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}", put(update_account))
        .route("/accounts/{id}", delete(delete_account))
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account name.
    pub name: String,
    /// Account type: Customer, Bank, or Expense.
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account name.
    pub name: Option<String>,
    /// Account type.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

fn map_error(e: &AccountError) -> axum::response::Response {
    match e {
        AccountError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not_found", "message": "Account not found" })),
        )
            .into_response(),
        AccountError::UnknownType(t) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_account_type",
                "message": format!("Unknown account type '{t}'. Must be one of: Customer, Bank, Expense")
            })),
        )
            .into_response(),
        AccountError::EmptyName => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "empty_name", "message": "Account name must not be empty" })),
        )
            .into_response(),
        AccountError::Database(_) => {
            error!(error = %e, "Account operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": "An error occurred" })),
            )
                .into_response()
        }
    }
}

/// GET /accounts - List the caller's accounts.
async fn list_accounts(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    match repo.list(auth.user_id()).await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// POST /accounts - Create an account.
async fn create_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    let input = CreateAccountInput {
        name: payload.name,
        account_type: payload.account_type,
    };

    match repo.create(auth.user_id(), input).await {
        Ok(account) => {
            info!(account_id = %account.id, "Account created");
            (StatusCode::CREATED, Json(json!({ "account": account }))).into_response()
        }
        Err(e) => map_error(&e),
    }
}

/// GET /accounts/{id} - Fetch one account.
async fn get_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    match repo.find_by_id(auth.user_id(), id).await {
        Ok(Some(account)) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Ok(None) => map_error(&AccountError::NotFound(id)),
        Err(e) => map_error(&e),
    }
}

/// PUT /accounts/{id} - Update an account.
async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    let input = UpdateAccountInput {
        name: payload.name,
        account_type: payload.account_type,
    };

    match repo.update(auth.user_id(), id, input).await {
        Ok(account) => (StatusCode::OK, Json(json!({ "account": account }))).into_response(),
        Err(e) => map_error(&e),
    }
}

/// DELETE /accounts/{id} - Delete an account. Its financial records remain.
async fn delete_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = AccountRepository::new((*state.db).clone());
    match repo.delete(auth.user_id(), id).await {
        Ok(()) => {
            info!(account_id = %id, "Account deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => map_error(&e),
    }
}
