//! Authentication routes for registration and login.
//!
//! Login is gated by account status: pending accounts wait for admin
//! approval, inactive and expired accounts are blocked, and an active
//! account whose AMC validity date has lapsed is flipped to Expired before
//! the rejection is returned.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info, warn};

use crate::AppState;
use gaurakshak_core::approval::{LoginGate, UserStatus, gate_login};
use gaurakshak_core::auth::{hash_password, verify_password};
use gaurakshak_db::{UserRepository, repositories::user::RegisterUserInput};
use gaurakshak_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal_error", "message": message })),
    )
        .into_response()
}

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

/// POST /auth/register - Register a new user in Pending status.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    if payload.password.len() < 8 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "weak_password",
                "message": "Password must be at least 8 characters"
            })),
        )
            .into_response();
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("An error occurred during registration");
        }
    };

    let user_repo = UserRepository::new((*state.db).clone());
    let input = RegisterUserInput {
        email: payload.email,
        password_hash,
        name: payload.name,
        address: payload.address,
        mobile_no: payload.mobile_no,
    };

    match user_repo.register(input).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "New user registered");
            (
                StatusCode::CREATED,
                Json(json!({
                    "user": {
                        "id": user.id,
                        "email": user.email,
                        "name": user.name,
                        "status": user.status
                    },
                    "message": "Registration successful. An admin will review your account."
                })),
            )
                .into_response()
        }
        Err(gaurakshak_db::repositories::UserError::EmailTaken(_)) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "email_exists",
                "message": "An account with this email already exists"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to register user");
            internal_error("An error occurred during registration")
        }
    }
}

/// POST /auth/login - Authenticate a user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let Some(status) = UserStatus::parse(&user.status) else {
        error!(user_id = %user.id, status = %user.status, "Stored user status failed to parse");
        return internal_error("An error occurred during login");
    };

    let today = chrono::Utc::now().date_naive();
    match gate_login(status, user.validity_date, today) {
        LoginGate::Allowed => {}
        LoginGate::PendingApproval => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "pending_approval",
                    "message": "Your account is awaiting admin approval"
                })),
            )
                .into_response();
        }
        LoginGate::Blocked => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "account_blocked",
                    "message": "This account is inactive or expired"
                })),
            )
                .into_response();
        }
        LoginGate::JustExpired => {
            // Persist the flip before rejecting.
            if let Err(e) = user_repo.mark_expired(user.id).await {
                error!(error = %e, user_id = %user.id, "Failed to mark user expired");
            } else {
                warn!(user_id = %user.id, "AMC validity lapsed; account expired");
            }
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "amc_expired",
                    "message": "Your AMC validity has expired. Submit a renewal to continue."
                })),
            )
                .into_response();
        }
    }

    let access_token = match state.jwt_service.generate_access_token(user.id, &user.role) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return internal_error("An error occurred during login");
        }
    };

    info!(user_id = %user.id, "User logged in successfully");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            status: user.status,
            customer_id: user.customer_id,
        },
        access_token,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
