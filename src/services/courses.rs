use std::collections::HashMap;

use uuid::Uuid;

use crate::filter::CourseFilter;
use crate::models::{Chapter, Course};
use crate::store::{CatalogStore, StoreResult};
use crate::views::{ChapterView, CourseView, LessonView, RatingsSummary};

use super::catalog::CatalogSnapshot;
use super::sellers::build_seller_view;

/// Chapters of a course with their lessons, ordered as the store hands
/// them out (`order_no` ascending at both levels).
pub async fn chapter_views(
    store: &dyn CatalogStore,
    course_id: &Uuid,
    seller_id: &Uuid,
) -> StoreResult<Vec<ChapterView>> {
    let chapters = store.list_chapters(course_id).await?;
    let mut views = Vec::with_capacity(chapters.len());
    for chapter in chapters {
        views.push(chapter_view(store, chapter, course_id, seller_id).await?);
    }
    Ok(views)
}

pub async fn chapter_view(
    store: &dyn CatalogStore,
    chapter: Chapter,
    course_id: &Uuid,
    seller_id: &Uuid,
) -> StoreResult<ChapterView> {
    let lessons = store
        .list_lessons(&chapter.id)
        .await?
        .into_iter()
        .map(|lesson| LessonView { lesson, course_id: *course_id, course_seller_id: *seller_id })
        .collect();
    Ok(ChapterView { chapter, lessons })
}

/// Assemble the full serialization graph for one course.
pub async fn build_course_view(
    store: &dyn CatalogStore,
    course: Course,
    snapshot: &CatalogSnapshot,
) -> StoreResult<CourseView> {
    let category = course.category_id.as_ref().and_then(|id| snapshot.category_view(id));
    let sub_category = course.sub_category_id.as_ref().and_then(|id| snapshot.sub_category_view(id));

    let seller = match store.get_seller(&course.seller_id).await? {
        Some(profile) => Some(build_seller_view(store, profile).await?),
        None => None,
    };

    let chapters = chapter_views(store, &course.id, &course.seller_id).await?;
    let ratings = RatingsSummary::from_reviews(store.list_course_ratings(&course.id).await?);
    let enrolled_user_count = store.enrollment_count(&course.id).await?;

    Ok(CourseView {
        course,
        category,
        sub_category,
        seller,
        chapters,
        ratings,
        enrolled_user_count,
    })
}

/// Published courses surviving `filter`, fully assembled for projection.
/// The filter also fixes the output ordering.
pub async fn published_course_views(
    store: &dyn CatalogStore,
    filter: &CourseFilter,
) -> StoreResult<Vec<CourseView>> {
    let snapshot = CatalogSnapshot::load(store).await?;
    let rows = filter.apply(snapshot.summaries.clone());

    let mut by_id: HashMap<Uuid, Course> = store
        .list_published_courses()
        .await?
        .into_iter()
        .map(|course| (course.id, course))
        .collect();

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        if let Some(course) = by_id.remove(&row.id) {
            views.push(build_course_view(store, course, &snapshot).await?);
        }
    }
    Ok(views)
}

/// One course by id, any status, fully assembled.
pub async fn course_detail(
    store: &dyn CatalogStore,
    id: &Uuid,
) -> StoreResult<Option<CourseView>> {
    let course = match store.get_course(id).await? {
        Some(course) => course,
        None => return Ok(None),
    };
    let snapshot = CatalogSnapshot::load(store).await?;
    Ok(Some(build_course_view(store, course, &snapshot).await?))
}
