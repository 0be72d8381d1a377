//! Account ledger routes.
//!
//! The statement is computed in `gaurakshak-core` from the owner's full
//! record log; a request with no account selected gets an empty statement
//! rather than an error.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, domain, middleware::AuthUser};
use gaurakshak_core::DateWindow;
use gaurakshak_core::export::ledger_table;
use gaurakshak_core::ledger::{AccountSelector, LedgerStatement, compute_statement};
use gaurakshak_db::FinanceRepository;

/// Selects the synthetic cash-customer ledger.
const CASH_SELECTOR: &str = "cash";

/// Creates the ledger routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger", get(get_ledger))
        .route("/ledger/export", get(export_ledger))
}

/// Query parameters for the ledger statement.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Account ID, or `cash` for the cash customer. Absent means no
    /// statement.
    pub account: Option<String>,
    /// Start day (inclusive).
    pub from: Option<NaiveDate>,
    /// End day (inclusive).
    pub to: Option<NaiveDate>,
}

enum Selection {
    None,
    Some(AccountSelector),
    Invalid(String),
}

fn parse_selector(account: Option<&str>) -> Selection {
    match account {
        None | Some("") => Selection::None,
        Some(CASH_SELECTOR) => Selection::Some(AccountSelector::CashCustomer),
        Some(raw) => match raw.parse::<Uuid>() {
            Ok(id) => Selection::Some(AccountSelector::Account(id)),
            Err(_) => Selection::Invalid(raw.to_string()),
        },
    }
}

async fn compute(
    state: &AppState,
    auth: &AuthUser,
    query: &LedgerQuery,
) -> Result<LedgerStatement, axum::response::Response> {
    let selector = match parse_selector(query.account.as_deref()) {
        Selection::None => return Ok(LedgerStatement::empty()),
        Selection::Some(selector) => selector,
        Selection::Invalid(raw) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_account",
                    "message": format!("'{raw}' is not an account id")
                })),
            )
                .into_response());
        }
    };

    let repo = FinanceRepository::new((*state.db).clone());
    let records = repo.list(auth.user_id(), None, None).await.map_err(|e| {
        error!(error = %e, "Failed to load records for ledger");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "internal_error", "message": "An error occurred" })),
        )
            .into_response()
    })?;

    let entries = domain::map_all(&records, domain::ledger_entry);
    let window = DateWindow { from: query.from, to: query.to };
    Ok(compute_statement(&selector, &entries, &window))
}

/// GET /ledger - Ledger statement with opening and closing balances.
async fn get_ledger(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LedgerQuery>,
) -> impl IntoResponse {
    match compute(&state, &auth, &query).await {
        Ok(statement) => (StatusCode::OK, Json(statement)).into_response(),
        Err(response) => response,
    }
}

/// GET /ledger/export - Ledger statement as a CSV download.
async fn export_ledger(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LedgerQuery>,
) -> impl IntoResponse {
    let statement = match compute(&state, &auth, &query).await {
        Ok(statement) => statement,
        Err(response) => return response,
    };

    match ledger_table(&statement).to_csv() {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"ledger.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize ledger CSV");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal_error", "message": "An error occurred" })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector() {
        assert!(matches!(parse_selector(None), Selection::None));
        assert!(matches!(parse_selector(Some("")), Selection::None));
        assert!(matches!(
            parse_selector(Some("cash")),
            Selection::Some(AccountSelector::CashCustomer)
        ));
        let id = Uuid::new_v4();
        assert!(matches!(
            parse_selector(Some(&id.to_string())),
            Selection::Some(AccountSelector::Account(parsed)) if parsed == id
        ));
        assert!(matches!(
            parse_selector(Some("not-a-uuid")),
            Selection::Invalid(_)
        ));
    }
}
