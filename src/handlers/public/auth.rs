use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::ok;
use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::config;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::models::{Role, User, UserStatus};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/register - create a buyer account and hand back a session
/// token
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<Value>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("A valid email address is required"));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::bad_request("First and last name are required"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::conflict(
            "This email address is already associated with another account.",
        ));
    }

    let user = User {
        id: Uuid::new_v4(),
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        email,
        password_hash: hash_password(&payload.password),
        status: UserStatus::Active,
        roles: vec![Role::Buyer],
        profile_image_key: None,
        date_joined: Utc::now(),
    };
    state.store.create_user(&user).await?;
    tracing::info!(user_id = %user.id, "registered new buyer account");

    session_response(&user)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Which surface the caller is signing in to; super-admin tokens are
    /// only minted for the admin platform.
    #[serde(default)]
    pub platform: Option<String>,
}

/// POST /auth/login - credential check, role-aware platform gate, JWT
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = state
        .store
        .find_user_by_email(payload.email.trim())
        .await?
        .ok_or_else(|| ApiError::unauthorized("Email address or password is invalid."))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Email address or password is invalid."));
    }

    let platform = payload.platform.as_deref().unwrap_or("USER");
    let allowed = match platform {
        "SUPER_ADMIN" => user.has_role(Role::SuperAdmin),
        _ => user.has_role(Role::Buyer) || user.has_role(Role::Seller),
    };
    if !allowed {
        return Err(ApiError::forbidden("You are not authorised to login this platform."));
    }

    if !user.status.can_authenticate() {
        return Err(ApiError::forbidden(format!(
            "User account is {}.",
            user.status.as_str().to_lowercase()
        )));
    }

    session_response(&user)
}

fn session_response(user: &User) -> Result<Json<Value>, ApiError> {
    let claims = Claims::new(user.id, user.email.clone(), user.roles.clone());
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Failed to create session token")
    })?;

    Ok(ok(json!({
        "token": token,
        "user": {
            "id": user.id,
            "first_name": user.first_name,
            "last_name": user.last_name,
            "email": user.email,
            "roles": user.roles,
            "status": user.status,
        },
        "expires_in": config::config().security.jwt_expiry_hours * 3600,
    })))
}
