use std::collections::HashSet;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Category, Chapter, Course, CourseSummary, Lesson, RatingWithUser, SellerWithUser, SubCategory,
    User,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The queryable data source the read API runs against.
///
/// Every method is a single eager read with a fixed ordering contract;
/// callers never see deferred queries. Soft-deleted rows are filtered out
/// by every implementation.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    // -- taxonomy -----------------------------------------------------------

    /// All categories, name ascending.
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    /// All sub-categories (optionally scoped to one category), name
    /// ascending.
    async fn list_sub_categories(&self, category: Option<&Uuid>) -> StoreResult<Vec<SubCategory>>;

    async fn get_category(&self, id: &Uuid) -> StoreResult<Option<Category>>;

    async fn get_sub_category(&self, id: &Uuid) -> StoreResult<Option<SubCategory>>;

    // -- courses ------------------------------------------------------------

    /// Published courses annotated with average rating and total lesson
    /// duration, `created_at` ascending.
    async fn published_course_summaries(&self) -> StoreResult<Vec<CourseSummary>>;

    /// Full rows of every published course, `created_at` ascending.
    async fn list_published_courses(&self) -> StoreResult<Vec<Course>>;

    async fn get_course(&self, id: &Uuid) -> StoreResult<Option<Course>>;

    /// Chapters of a course, `order_no` ascending.
    async fn list_chapters(&self, course: &Uuid) -> StoreResult<Vec<Chapter>>;

    async fn get_chapter(&self, id: &Uuid) -> StoreResult<Option<Chapter>>;

    /// Lessons of a chapter, `order_no` ascending.
    async fn list_lessons(&self, chapter: &Uuid) -> StoreResult<Vec<Lesson>>;

    /// Reviews of a course joined with reviewer display fields,
    /// `created_at` descending.
    async fn list_course_ratings(&self, course: &Uuid) -> StoreResult<Vec<RatingWithUser>>;

    async fn enrollment_count(&self, course: &Uuid) -> StoreResult<u64>;

    /// Ids of the courses a user is enrolled in.
    async fn enrolled_course_ids(&self, user: &Uuid) -> StoreResult<HashSet<Uuid>>;

    // -- users and sellers --------------------------------------------------

    async fn get_user(&self, id: &Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn create_user(&self, user: &User) -> StoreResult<()>;

    /// Seller profiles joined with the owning user, name ascending.
    async fn list_sellers(&self) -> StoreResult<Vec<SellerWithUser>>;

    async fn get_seller(&self, user_id: &Uuid) -> StoreResult<Option<SellerWithUser>>;

    // -- token revocation ---------------------------------------------------

    async fn revoke_token(&self, token: &str) -> StoreResult<()>;

    async fn is_token_revoked(&self, token: &str) -> StoreResult<bool>;
}
