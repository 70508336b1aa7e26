use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{decode_jwt, Viewer, ViewerUser};
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::models::Role;
use crate::store::CatalogStore;

/// Authenticated user context extracted from a validated JWT. The raw
/// token rides along so logout can revoke it.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<Role>,
    pub token: String,
}

/// JWT authentication middleware for the protected routes: validates the
/// bearer token, rejects revoked ones, and injects [`AuthUser`].
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(request.headers()).map_err(ApiError::unauthorized)?;

    let claims = decode_jwt(&token)
        .map_err(|e| ApiError::unauthorized(format!("Invalid JWT token: {}", e)))?;

    if state.store.is_token_revoked(&token).await? {
        return Err(ApiError::unauthorized("Token has been revoked"));
    }

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        roles: claims.roles,
        token,
    });

    Ok(next.run(request).await)
}

/// Resolve the viewer for the public read endpoints, where anonymous
/// access is allowed and a broken or revoked token simply downgrades to
/// anonymous instead of failing the request.
pub async fn optional_viewer(headers: &HeaderMap, store: &dyn CatalogStore) -> Viewer {
    let token = match extract_bearer_token(headers) {
        Ok(token) => token,
        Err(_) => return Viewer::anonymous(),
    };
    let claims = match decode_jwt(&token) {
        Ok(claims) => claims,
        Err(_) => return Viewer::anonymous(),
    };
    if store.is_token_revoked(&token).await.unwrap_or(true) {
        return Viewer::anonymous();
    }

    let enrolled_course_ids = store.enrolled_course_ids(&claims.sub).await.unwrap_or_default();
    Viewer {
        user: Some(ViewerUser { id: claims.sub, roles: claims.roles, enrolled_course_ids }),
    }
}

/// Extract the JWT from the Authorization header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
