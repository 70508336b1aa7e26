use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::ok;
use crate::auth::Viewer;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::projection::{parse_fields, project, project_all};
use crate::services;
use crate::views::RenderEnv;

#[derive(Debug, Deserialize)]
pub struct SellerQuery {
    pub fields: Option<String>,
}

/// GET /api/sellers - seller profiles with storefront aggregates
pub async fn seller_list(
    State(state): State<AppState>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<Value>, ApiError> {
    let selection = parse_fields(query.fields.as_deref());
    let views = services::sellers::seller_list(state.store.as_ref()).await?;
    let env = RenderEnv::new(Viewer::anonymous(), state.signer.clone());
    Ok(ok(project_all(&views, selection.top(), &selection.context, &env)))
}

/// GET /api/sellers/:id - one seller profile by owning user id
pub async fn seller_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<SellerQuery>,
) -> Result<Json<Value>, ApiError> {
    let selection = parse_fields(query.fields.as_deref());
    let view = services::sellers::seller_detail(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Seller not found"))?;
    let env = RenderEnv::new(Viewer::anonymous(), state.signer.clone());
    Ok(ok(project(&view, selection.top(), &selection.context, &env)))
}
