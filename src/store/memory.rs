use std::collections::HashSet;
use std::sync::RwLock;

use uuid::Uuid;

use crate::models::{
    Category, Chapter, Course, CourseStatus, CourseSummary, Enrollment, Lesson, RatingWithUser,
    SellerWithUser, SubCategory, User,
};

use super::traits::{CatalogStore, StoreError, StoreResult};

/// In-memory [`CatalogStore`] used by the test suite and the no-database
/// demo mode.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    categories: Vec<Category>,
    sub_categories: Vec<SubCategory>,
    courses: Vec<Course>,
    chapters: Vec<Chapter>,
    lessons: Vec<Lesson>,
    ratings: Vec<RatingWithUser>,
    enrollments: Vec<Enrollment>,
    users: Vec<User>,
    sellers: Vec<SellerWithUser>,
    revoked_tokens: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&self, category: Category) {
        self.inner.write().unwrap().categories.push(category);
    }

    pub fn add_sub_category(&self, sub_category: SubCategory) {
        self.inner.write().unwrap().sub_categories.push(sub_category);
    }

    pub fn add_course(&self, course: Course) {
        self.inner.write().unwrap().courses.push(course);
    }

    pub fn add_chapter(&self, chapter: Chapter) {
        self.inner.write().unwrap().chapters.push(chapter);
    }

    pub fn add_lesson(&self, lesson: Lesson) {
        self.inner.write().unwrap().lessons.push(lesson);
    }

    pub fn add_rating(&self, rating: RatingWithUser) {
        self.inner.write().unwrap().ratings.push(rating);
    }

    pub fn add_enrollment(&self, enrollment: Enrollment) {
        self.inner.write().unwrap().enrollments.push(enrollment);
    }

    pub fn add_user(&self, user: User) {
        self.inner.write().unwrap().users.push(user);
    }

    pub fn add_seller(&self, seller: SellerWithUser) {
        self.inner.write().unwrap().sellers.push(seller);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap()
    }
}

impl Inner {
    fn course_duration_secs(&self, course: &Uuid) -> i64 {
        let chapter_ids: HashSet<Uuid> = self
            .chapters
            .iter()
            .filter(|c| c.course_id == *course && !c.is_deleted)
            .map(|c| c.id)
            .collect();
        self.lessons
            .iter()
            .filter(|l| chapter_ids.contains(&l.chapter_id) && !l.is_deleted)
            .map(|l| l.duration_secs)
            .sum()
    }

    fn course_avg_rating(&self, course: &Uuid) -> f64 {
        let stars: Vec<i32> = self
            .ratings
            .iter()
            .filter(|r| r.course_id == *course && !r.is_deleted)
            .map(|r| r.rating)
            .collect();
        if stars.is_empty() {
            return 0.0;
        }
        stars.iter().sum::<i32>() as f64 / stars.len() as f64
    }
}

#[async_trait::async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.read().categories.iter().filter(|c| !c.is_deleted).cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_sub_categories(&self, category: Option<&Uuid>) -> StoreResult<Vec<SubCategory>> {
        let mut subs: Vec<SubCategory> = self
            .read()
            .sub_categories
            .iter()
            .filter(|sc| !sc.is_deleted)
            .filter(|sc| category.map_or(true, |id| sc.category_id == *id))
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subs)
    }

    async fn get_category(&self, id: &Uuid) -> StoreResult<Option<Category>> {
        Ok(self.read().categories.iter().find(|c| c.id == *id && !c.is_deleted).cloned())
    }

    async fn get_sub_category(&self, id: &Uuid) -> StoreResult<Option<SubCategory>> {
        Ok(self.read().sub_categories.iter().find(|sc| sc.id == *id && !sc.is_deleted).cloned())
    }

    async fn published_course_summaries(&self) -> StoreResult<Vec<CourseSummary>> {
        let inner = self.read();
        let mut summaries: Vec<CourseSummary> = inner
            .courses
            .iter()
            .filter(|c| c.course_status == CourseStatus::Published && !c.is_deleted)
            .map(|c| CourseSummary {
                id: c.id,
                title: c.title.clone(),
                seller_id: c.seller_id,
                category_id: c.category_id,
                sub_category_id: c.sub_category_id,
                sale_price: c.sale_price,
                avg_rating: inner.course_avg_rating(&c.id),
                duration_secs: inner.course_duration_secs(&c.id),
                created_at: c.created_at,
            })
            .collect();
        summaries.sort_by_key(|s| s.created_at);
        Ok(summaries)
    }

    async fn list_published_courses(&self) -> StoreResult<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .read()
            .courses
            .iter()
            .filter(|c| c.course_status == CourseStatus::Published && !c.is_deleted)
            .cloned()
            .collect();
        courses.sort_by_key(|c| c.created_at);
        Ok(courses)
    }

    async fn get_course(&self, id: &Uuid) -> StoreResult<Option<Course>> {
        Ok(self.read().courses.iter().find(|c| c.id == *id && !c.is_deleted).cloned())
    }

    async fn list_chapters(&self, course: &Uuid) -> StoreResult<Vec<Chapter>> {
        let mut chapters: Vec<Chapter> = self
            .read()
            .chapters
            .iter()
            .filter(|c| c.course_id == *course && !c.is_deleted)
            .cloned()
            .collect();
        chapters.sort_by_key(|c| c.order_no);
        Ok(chapters)
    }

    async fn get_chapter(&self, id: &Uuid) -> StoreResult<Option<Chapter>> {
        Ok(self.read().chapters.iter().find(|c| c.id == *id && !c.is_deleted).cloned())
    }

    async fn list_lessons(&self, chapter: &Uuid) -> StoreResult<Vec<Lesson>> {
        let mut lessons: Vec<Lesson> = self
            .read()
            .lessons
            .iter()
            .filter(|l| l.chapter_id == *chapter && !l.is_deleted)
            .cloned()
            .collect();
        lessons.sort_by_key(|l| l.order_no);
        Ok(lessons)
    }

    async fn list_course_ratings(&self, course: &Uuid) -> StoreResult<Vec<RatingWithUser>> {
        let mut ratings: Vec<RatingWithUser> = self
            .read()
            .ratings
            .iter()
            .filter(|r| r.course_id == *course && !r.is_deleted)
            .cloned()
            .collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ratings)
    }

    async fn enrollment_count(&self, course: &Uuid) -> StoreResult<u64> {
        Ok(self.read().enrollments.iter().filter(|e| e.course_id == *course).count() as u64)
    }

    async fn enrolled_course_ids(&self, user: &Uuid) -> StoreResult<HashSet<Uuid>> {
        Ok(self
            .read()
            .enrollments
            .iter()
            .filter(|e| e.user_id == *user)
            .map(|e| e.course_id)
            .collect())
    }

    async fn get_user(&self, id: &Uuid) -> StoreResult<Option<User>> {
        Ok(self.read().users.iter().find(|u| u.id == *id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.read().users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut inner = self.inner.write().unwrap();
        if inner.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Query(format!("duplicate email: {}", user.email)));
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn list_sellers(&self) -> StoreResult<Vec<SellerWithUser>> {
        let mut sellers: Vec<SellerWithUser> =
            self.read().sellers.iter().filter(|s| !s.is_deleted).cloned().collect();
        sellers.sort_by(|a, b| {
            (a.user_first_name.as_str(), a.user_last_name.as_str())
                .cmp(&(b.user_first_name.as_str(), b.user_last_name.as_str()))
        });
        Ok(sellers)
    }

    async fn get_seller(&self, user_id: &Uuid) -> StoreResult<Option<SellerWithUser>> {
        Ok(self.read().sellers.iter().find(|s| s.user_id == *user_id && !s.is_deleted).cloned())
    }

    async fn revoke_token(&self, token: &str) -> StoreResult<()> {
        self.inner.write().unwrap().revoked_tokens.insert(token.to_string());
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> StoreResult<bool> {
        Ok(self.read().revoked_tokens.contains(token))
    }
}
