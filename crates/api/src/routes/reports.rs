//! Herd report routes.
//!
//! Every report has a JSON endpoint and a `/export` CSV twin carrying the
//! same tabular shape. All derivations run in `gaurakshak-core` over the
//! owner's roster and movement log.

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

use crate::{AppState, domain, middleware::AuthUser};
use gaurakshak_core::DateWindow;
use gaurakshak_core::export::{
    Table, cross_tab_table, daily_summary_table, detailed_table, movements_table, registry_table,
};
use gaurakshak_core::herd::{Animal, Movement, MovementKind, cross_tab_summary, daily_summary};
use gaurakshak_core::registry::{
    AgeBucket, RegistryFilter, detailed_report, filter_registry, movement_history,
};
use gaurakshak_db::{AnimalRepository, MovementRepository};

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/registry", get(registry))
        .route("/reports/registry/export", get(registry_export))
        .route("/reports/movements", get(movements))
        .route("/reports/movements/export", get(movements_export))
        .route("/reports/daily-summary", get(daily))
        .route("/reports/daily-summary/export", get(daily_export))
        .route("/reports/cross-tab", get(cross_tab))
        .route("/reports/cross-tab/export", get(cross_tab_export))
        .route("/reports/detailed", get(detailed))
        .route("/reports/detailed/export", get(detailed_export))
}

/// Query parameters for the registry report.
#[derive(Debug, Deserialize)]
pub struct RegistryQuery {
    /// Species filter.
    #[serde(rename = "type")]
    pub species: Option<String>,
    /// Breed filter.
    pub breed: Option<String>,
    /// Color filter.
    pub color: Option<String>,
    /// Health status filter (stored string form).
    pub health_status: Option<String>,
    /// Age bucket filter: 0-2, 3-5, 6-10, or 10+.
    pub age: Option<String>,
}

/// Query parameters for the movement history report.
#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    /// Direction filter: Entry or Exit.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Case-insensitive search over reason and tag.
    pub search: Option<String>,
}

/// Query parameters for the windowed summaries.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Start day (inclusive); without it the summary is empty.
    pub from: Option<NaiveDate>,
    /// End day (inclusive); defaults to the start day.
    pub to: Option<NaiveDate>,
    /// Species filter.
    #[serde(rename = "type")]
    pub species: Option<String>,
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": "An error occurred" })),
    )
        .into_response()
}

fn csv_response(table: &Table, filename: &str) -> axum::response::Response {
    match table.to_csv() {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize report CSV");
            internal_error()
        }
    }
}

/// Loads the owner's roster and movement log as domain values.
async fn load_herd(
    state: &AppState,
    auth: &AuthUser,
) -> Result<(Vec<Animal>, Vec<Movement>), axum::response::Response> {
    let animal_repo = AnimalRepository::new((*state.db).clone());
    let movement_repo = MovementRepository::new((*state.db).clone());

    let animals = animal_repo.list(auth.user_id()).await.map_err(|e| {
        error!(error = %e, "Failed to load animals for report");
        internal_error()
    })?;
    let movements = movement_repo.list(auth.user_id()).await.map_err(|e| {
        error!(error = %e, "Failed to load movements for report");
        internal_error()
    })?;

    Ok((
        domain::map_all(&animals, domain::animal),
        domain::map_all(&movements, domain::movement),
    ))
}

fn registry_filter(query: &RegistryQuery) -> RegistryFilter {
    RegistryFilter {
        species: query.species.clone(),
        breed: query.breed.clone(),
        color: query.color.clone(),
        health_status: query.health_status.clone(),
        age: query.age.as_deref().and_then(AgeBucket::parse),
    }
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// GET /reports/registry - Filtered animal registry.
async fn registry(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RegistryQuery>,
) -> impl IntoResponse {
    let (animals, _) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let rows = filter_registry(&animals, &registry_filter(&query), today());
    (StatusCode::OK, Json(json!({ "animals": rows }))).into_response()
}

/// GET /reports/registry/export - Registry as CSV.
async fn registry_export(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RegistryQuery>,
) -> impl IntoResponse {
    let (animals, _) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let now = today();
    let rows = filter_registry(&animals, &registry_filter(&query), now);
    csv_response(&registry_table(&rows, now), "registry.csv")
}

/// GET /reports/movements - Movement history with tags resolved.
async fn movements(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MovementsQuery>,
) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let kind = query.kind.as_deref().and_then(MovementKind::parse);
    let rows = movement_history(&animals, &log, kind, query.search.as_deref());
    (StatusCode::OK, Json(json!({ "movements": rows }))).into_response()
}

/// GET /reports/movements/export - Movement history as CSV.
async fn movements_export(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MovementsQuery>,
) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let kind = query.kind.as_deref().and_then(MovementKind::parse);
    let rows = movement_history(&animals, &log, kind, query.search.as_deref());
    csv_response(&movements_table(&rows), "movements.csv")
}

/// GET /reports/daily-summary - Day-by-day headcount reconstruction.
async fn daily(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let window = DateWindow { from: query.from, to: query.to };
    let rows = daily_summary(&animals, &log, query.species.as_deref(), &window);
    (StatusCode::OK, Json(json!({ "days": rows }))).into_response()
}

/// GET /reports/daily-summary/export - Daily summary as CSV.
async fn daily_export(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let window = DateWindow { from: query.from, to: query.to };
    let rows = daily_summary(&animals, &log, query.species.as_deref(), &window);
    csv_response(&daily_summary_table(&rows), "daily-summary.csv")
}

/// GET /reports/cross-tab - Gender by cohort aggregate over the range.
async fn cross_tab(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let window = DateWindow { from: query.from, to: query.to };
    let report = cross_tab_summary(&animals, &log, query.species.as_deref(), &window);
    (StatusCode::OK, Json(json!({ "report": report }))).into_response()
}

/// GET /reports/cross-tab/export - Cross-tab as CSV.
async fn cross_tab_export(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let window = DateWindow { from: query.from, to: query.to };
    let table = match cross_tab_summary(&animals, &log, query.species.as_deref(), &window) {
        Some(report) => cross_tab_table(&report),
        // No range selected: headers only.
        None => {
            let mut table = cross_tab_table(&gaurakshak_core::herd::CrossTabReport::default());
            table.rows.clear();
            table
        }
    };
    csv_response(&table, "cross-tab.csv")
}

/// GET /reports/detailed - Per-animal stay report.
async fn detailed(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let rows = detailed_report(&animals, &log, today());
    (StatusCode::OK, Json(json!({ "animals": rows }))).into_response()
}

/// GET /reports/detailed/export - Detailed stay report as CSV.
async fn detailed_export(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let (animals, log) = match load_herd(&state, &auth).await {
        Ok(herd) => herd,
        Err(response) => return response,
    };
    let rows = detailed_report(&animals, &log, today());
    csv_response(&detailed_table(&rows), "detailed.csv")
}
