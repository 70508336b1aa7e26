use axum::routing::{delete, get, post};
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{protected, public, AppState};
use crate::middleware::jwt_auth_middleware;

/// Assemble the full application router.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/whoami", get(protected::auth::whoami))
        .route("/api/auth/session", delete(protected::auth::logout))
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        // Catalog browsing (anonymous allowed; a bearer token upgrades the viewer)
        .route("/api/catalog/categories", get(public::catalog::category_list))
        .route("/api/catalog/sub-categories", get(public::catalog::sub_category_list))
        .route("/api/courses", get(public::courses::course_list))
        .route("/api/courses/facets", get(public::courses::course_facets))
        .route("/api/courses/:id", get(public::courses::course_detail))
        .route("/api/chapters", get(public::courses::chapter_list))
        .route("/api/lessons", get(public::courses::lesson_list))
        .route("/api/sellers", get(public::sellers::seller_list))
        .route("/api/sellers/:id", get(public::sellers::seller_detail))
        // Protected session management
        .merge(protected_routes)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Coursemart API (Rust)",
            "version": version,
            "description": "Course marketplace backend API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public), /api/auth/* (protected)",
                "catalog": "/api/catalog/categories, /api/catalog/sub-categories (public)",
                "courses": "/api/courses[?filters], /api/courses/facets, /api/courses/:id (public)",
                "content": "/api/chapters?course=, /api/lessons?chapter= (public, video gated)",
                "sellers": "/api/sellers[/:id] (public)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": e.to_string()
                }
            })),
        ),
    }
}
