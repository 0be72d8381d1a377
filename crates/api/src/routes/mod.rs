//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod accounts;
pub mod amc;
pub mod animals;
pub mod auth;
pub mod finance;
pub mod health;
pub mod ledger;
pub mod milk;
pub mod movements;
pub mod reports;
pub mod users;

/// Creates the API router with all routes.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(users::routes())
        .merge(accounts::routes())
        .merge(finance::routes())
        .merge(milk::routes())
        .merge(animals::routes())
        .merge(movements::routes())
        .merge(ledger::routes())
        .merge(reports::routes())
        .merge(amc::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}
