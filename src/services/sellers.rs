use uuid::Uuid;

use crate::models::SellerWithUser;
use crate::store::{CatalogStore, StoreResult};
use crate::views::SellerView;

/// Assemble one seller view: profile plus the storefront aggregates
/// (overall rating across published courses, students, course count).
pub async fn build_seller_view(
    store: &dyn CatalogStore,
    seller: SellerWithUser,
) -> StoreResult<SellerView> {
    let summaries = store.published_course_summaries().await?;
    let course_ids: Vec<Uuid> = summaries
        .iter()
        .filter(|s| s.seller_id == seller.user_id)
        .map(|s| s.id)
        .collect();

    let mut star_sum = 0i64;
    let mut review_count = 0u64;
    let mut student_count = 0u64;
    for course_id in &course_ids {
        for rating in store.list_course_ratings(course_id).await? {
            star_sum += rating.rating as i64;
            review_count += 1;
        }
        student_count += store.enrollment_count(course_id).await?;
    }

    let total_rating = if review_count > 0 {
        ((star_sum as f64 / review_count as f64) * 100.0).round() / 100.0
    } else {
        0.0
    };

    Ok(SellerView {
        seller,
        total_rating,
        total_reviews_count: review_count,
        student_count,
        courses_count: course_ids.len() as u64,
    })
}

pub async fn seller_list(store: &dyn CatalogStore) -> StoreResult<Vec<SellerView>> {
    let sellers = store.list_sellers().await?;
    let mut views = Vec::with_capacity(sellers.len());
    for seller in sellers {
        views.push(build_seller_view(store, seller).await?);
    }
    Ok(views)
}

pub async fn seller_detail(
    store: &dyn CatalogStore,
    user_id: &Uuid,
) -> StoreResult<Option<SellerView>> {
    match store.get_seller(user_id).await? {
        Some(seller) => Ok(Some(build_seller_view(store, seller).await?)),
        None => Ok(None),
    }
}
