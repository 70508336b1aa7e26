use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::api::{ok, paginate, PageQuery};
use crate::config;
use crate::error::ApiError;
use crate::filter::{CourseFilter, CourseFilterParams};
use crate::handlers::AppState;
use crate::middleware::optional_viewer;
use crate::projection::{parse_fields, project, project_all};
use crate::services;
use crate::views::RenderEnv;

/// Query surface shared by the course list and facet endpoints: refinement
/// filters plus projection and pagination switches.
#[derive(Debug, Default, Deserialize)]
pub struct CourseListQuery {
    pub fields: Option<String>,
    pub pagination: Option<String>,
    pub page: Option<usize>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub seller: Option<String>,
    pub rating: Option<f64>,
    pub duration: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

impl CourseListQuery {
    fn filter(&self) -> CourseFilter {
        CourseFilter::from_params(&CourseFilterParams {
            category: self.category.clone(),
            subcategory: self.subcategory.clone(),
            seller: self.seller.clone(),
            rating: self.rating,
            duration: self.duration.clone(),
            search: self.search.clone(),
            ordering: self.ordering.clone(),
        })
    }

    fn page_query(&self) -> PageQuery {
        PageQuery { pagination: self.pagination.clone(), page: self.page }
    }
}

/// GET /api/courses - published course list with refinement filters,
/// ordering, projection and opt-in pagination
pub async fn course_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<Value>, ApiError> {
    let viewer = optional_viewer(&headers, state.store.as_ref()).await;
    let selection = parse_fields(query.fields.as_deref());
    let filter = query.filter();

    let views = services::courses::published_course_views(state.store.as_ref(), &filter).await?;

    let env = RenderEnv::new(viewer, state.signer.clone());
    let items = match project_all(&views, selection.top(), &selection.context, &env) {
        Value::Array(items) => items,
        _ => vec![],
    };
    let data = paginate(items, &query.page_query(), config::config().api.page_size);
    Ok(ok(data))
}

/// GET /api/courses/facets - category/rating/seller/duration counts for
/// the same filter surface as the course list
pub async fn course_facets(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = query.filter();
    let data = services::facets::facet_counts(state.store.as_ref(), &filter).await?;
    Ok(ok(data))
}

#[derive(Debug, Deserialize)]
pub struct CourseDetailQuery {
    pub fields: Option<String>,
}

/// GET /api/courses/:id - one course with its full serialization graph
pub async fn course_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Query(query): Query<CourseDetailQuery>,
) -> Result<Json<Value>, ApiError> {
    let viewer = optional_viewer(&headers, state.store.as_ref()).await;
    let selection = parse_fields(query.fields.as_deref());

    let view = services::courses::course_detail(state.store.as_ref(), &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let env = RenderEnv::new(viewer, state.signer.clone());
    Ok(ok(project(&view, selection.top(), &selection.context, &env)))
}

#[derive(Debug, Deserialize)]
pub struct ChapterListQuery {
    pub course: Uuid,
    pub fields: Option<String>,
    pub pagination: Option<String>,
    pub page: Option<usize>,
}

/// GET /api/chapters?course= - chapters of a course, order_no ascending
pub async fn chapter_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ChapterListQuery>,
) -> Result<Json<Value>, ApiError> {
    let viewer = optional_viewer(&headers, state.store.as_ref()).await;
    let selection = parse_fields(query.fields.as_deref());

    let course = state
        .store
        .get_course(&query.course)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let views =
        services::courses::chapter_views(state.store.as_ref(), &course.id, &course.seller_id)
            .await?;

    let env = RenderEnv::new(viewer, state.signer.clone());
    let items = match project_all(&views, selection.top(), &selection.context, &env) {
        Value::Array(items) => items,
        _ => vec![],
    };
    let page_query = PageQuery { pagination: query.pagination, page: query.page };
    Ok(ok(paginate(items, &page_query, config::config().api.page_size)))
}

#[derive(Debug, Deserialize)]
pub struct LessonListQuery {
    pub chapter: Uuid,
    pub fields: Option<String>,
    pub pagination: Option<String>,
    pub page: Option<usize>,
}

/// GET /api/lessons?chapter= - lessons of a chapter, order_no ascending,
/// video field gated by the viewer's access
pub async fn lesson_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LessonListQuery>,
) -> Result<Json<Value>, ApiError> {
    let viewer = optional_viewer(&headers, state.store.as_ref()).await;
    let selection = parse_fields(query.fields.as_deref());

    let chapter = state
        .store
        .get_chapter(&query.chapter)
        .await?
        .ok_or_else(|| ApiError::not_found("Chapter not found"))?;
    let course = state
        .store
        .get_course(&chapter.course_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    let view =
        services::courses::chapter_view(state.store.as_ref(), chapter, &course.id, &course.seller_id)
            .await?;

    let env = RenderEnv::new(viewer, state.signer.clone());
    let items = match project_all(&view.lessons, selection.top(), &selection.context, &env) {
        Value::Array(items) => items,
        _ => vec![],
    };
    let page_query = PageQuery { pagination: query.pagination, page: query.page };
    Ok(ok(paginate(items, &page_query, config::config().api.page_size)))
}
