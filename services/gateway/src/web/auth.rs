//! services/gateway/src/web/auth.rs
//!
//! Account endpoints: registration and login.

use std::sync::Arc;

use argon2::Argon2;
use password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use traveller_core::domain::{User, UserType};
use utoipa::ToSchema;

use crate::web::reply::{failure, success, Reply};
use crate::web::state::AppState;

//=========================================================================================
// Request Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub user_type: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn parse_user_type(raw: &str) -> Option<UserType> {
    match raw {
        "Traveler" => Some(UserType::Traveler),
        "Community" => Some(UserType::Community),
        _ => None,
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/register/ - Create a new account
#[utoipa::path(
    post,
    path = "/api/register/",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registration successful"),
        (status = 400, description = "Invalid user type, missing field or email taken")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Reply {
    let user_type = parse_user_type(&req.user_type)
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "Invalid user type"))?;
    if [&req.name, &req.email, &req.phone, &req.password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(failure(StatusCode::BAD_REQUEST, "All fields are required"));
    }

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password")
        })?
        .to_string();

    // 2. Store the account
    let user = User {
        id: 0,
        name: req.name,
        email: req.email,
        phone: Some(req.phone),
        user_type: Some(user_type),
        loved_ones: Vec::new(),
        created_at: None,
    };
    let user_id = state
        .directory
        .lock()
        .await
        .create_account(user, password_hash)
        .ok_or_else(|| {
            failure(
                StatusCode::BAD_REQUEST,
                "A user with this email already exists",
            )
        })?;

    info!(user_id, "Account registered.");
    success(json!({ "message": "Registration successful" }))
}

/// POST /api/login/ - Login with an existing account
#[utoipa::path(
    post,
    path = "/api/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, user profile returned"),
        (status = 400, description = "Invalid credentials"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Reply {
    // 1. Get the account by email
    let account = state
        .directory
        .lock()
        .await
        .account_by_email(&req.email)
        .cloned()
        .ok_or_else(|| failure(StatusCode::NOT_FOUND, "User not found"))?;

    // 2. Verify the password
    let parsed_hash = PasswordHash::new(&account.password_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        failure(StatusCode::INTERNAL_SERVER_ERROR, "Authentication error")
    })?;
    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();
    if !valid {
        return Err(failure(StatusCode::BAD_REQUEST, "Invalid credentials"));
    }

    info!(user_id = account.user.id, "Login accepted.");
    success(json!({
        "message": "Login successful",
        "user": account.user,
    }))
}
