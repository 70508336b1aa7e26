use axum::extract::State;
use axum::{Extension, Json};
use serde_json::{json, Value};

use crate::api::ok;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::AuthUser;

/// GET /api/auth/whoami - echo the authenticated identity
pub async fn whoami(Extension(auth): Extension<AuthUser>) -> Json<Value> {
    ok(json!({
        "id": auth.user_id,
        "email": auth.email,
        "roles": auth.roles,
    }))
}

/// DELETE /api/auth/session - logout; the presented token goes on the
/// revocation list and stops working everywhere
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Value>, ApiError> {
    state.store.revoke_token(&auth.token).await?;
    tracing::info!(user_id = %auth.user_id, "session revoked");
    Ok(ok(json!({ "message": "Logged out" })))
}
