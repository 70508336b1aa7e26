use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::ok;
use crate::auth::Viewer;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::projection::{parse_fields, project_all};
use crate::services;
use crate::views::RenderEnv;

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    pub fields: Option<String>,
}

/// GET /api/catalog/categories - category list with sub-categories and
/// published-course counts
pub async fn category_list(
    State(state): State<AppState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<Value>, ApiError> {
    let selection = parse_fields(query.fields.as_deref());
    let views = services::catalog::category_list(state.store.as_ref()).await?;
    let env = RenderEnv::new(Viewer::anonymous(), state.signer.clone());
    Ok(ok(project_all(&views, selection.top(), &selection.context, &env)))
}

#[derive(Debug, Deserialize)]
pub struct SubCategoryListQuery {
    pub category: Option<Uuid>,
    pub fields: Option<String>,
}

/// GET /api/catalog/sub-categories - sub-category list, optionally scoped
/// to one category
pub async fn sub_category_list(
    State(state): State<AppState>,
    Query(query): Query<SubCategoryListQuery>,
) -> Result<Json<Value>, ApiError> {
    let selection = parse_fields(query.fields.as_deref());
    let views =
        services::catalog::sub_category_list(state.store.as_ref(), query.category.as_ref()).await?;
    let env = RenderEnv::new(Viewer::anonymous(), state.signer.clone());
    Ok(ok(project_all(&views, selection.top(), &selection.context, &env)))
}
