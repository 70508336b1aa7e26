use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::models::{Chapter, Course, Lesson, RatingWithUser};
use crate::projection::{project, project_all, Projectable, ProjectionContext};

use super::{format_duration, signed_url, CategoryView, RenderEnv, SellerView, SubCategoryView};

/// One review row, annotated with the reviewer's display fields.
#[derive(Debug, Clone)]
pub struct RatingView {
    pub rating: RatingWithUser,
}

impl Projectable for RatingView {
    type Env = RenderEnv;

    fn declared_fields(&self) -> &'static [&'static str] {
        &[
            "id",
            "course",
            "user",
            "rating",
            "title",
            "description",
            "is_deleted",
            "created_by",
            "updated_by",
            "created_at",
            "updated_at",
            "user_first_name",
            "user_last_name",
            "user_profile_image",
            "user_profile_image_key",
        ]
    }

    fn render_field(&self, name: &str, _ctx: &ProjectionContext, env: &RenderEnv) -> Option<Value> {
        let r = &self.rating;
        let value = match name {
            "id" => json!(r.id),
            "course" => json!(r.course_id),
            "user" => json!(r.user_id),
            "rating" => json!(r.rating),
            "title" => json!(r.title),
            "description" => json!(r.description),
            "is_deleted" => json!(r.is_deleted),
            "created_by" => json!(r.created_by),
            "updated_by" => json!(r.updated_by),
            "created_at" => json!(r.created_at),
            "updated_at" => json!(r.updated_at),
            "user_first_name" => json!(r.user_first_name),
            "user_last_name" => json!(r.user_last_name),
            "user_profile_image" => signed_url(env, r.user_profile_image_key.as_deref()),
            "user_profile_image_key" => json!(r.user_profile_image_key),
            _ => return None,
        };
        Some(value)
    }
}

/// Review aggregate attached to a course: overall average, count,
/// per-star percentage breakdown and the ordered review list.
#[derive(Debug, Clone)]
pub struct RatingsSummary {
    pub total_rating: f64,
    pub total_reviews_count: u64,
    /// Percentage of reviews per star; index 0 is one star.
    pub star_percentage: [u32; 5],
    pub reviews: Vec<RatingView>,
}

impl RatingsSummary {
    /// Build from reviews already ordered `created_at` descending.
    pub fn from_reviews(reviews: Vec<RatingWithUser>) -> Self {
        let count = reviews.len() as u64;
        let mut star_counts = [0u64; 5];
        let mut star_sum = 0i64;
        for review in &reviews {
            star_sum += review.rating as i64;
            if (1..=5).contains(&review.rating) {
                star_counts[(review.rating - 1) as usize] += 1;
            }
        }

        let total_rating = if count > 0 {
            ((star_sum as f64 / count as f64) * 100.0).round() / 100.0
        } else {
            0.0
        };
        let mut star_percentage = [0u32; 5];
        if count > 0 {
            for (pct, &star_count) in star_percentage.iter_mut().zip(&star_counts) {
                *pct = ((star_count as f64 / count as f64) * 100.0) as u32;
            }
        }

        Self {
            total_rating,
            total_reviews_count: count,
            star_percentage,
            reviews: reviews.into_iter().map(|rating| RatingView { rating }).collect(),
        }
    }

    fn render(&self, ctx: &ProjectionContext, env: &RenderEnv) -> Value {
        let mut percentage = Map::new();
        for (star, pct) in self.star_percentage.iter().enumerate() {
            percentage.insert((star + 1).to_string(), json!(pct));
        }
        json!({
            "total_rating": self.total_rating,
            "total_reviews_count": self.total_reviews_count,
            "all_star_percentage": percentage,
            "reviews_obj": project_all(&self.reviews, ctx.nested("reviews_obj"), ctx, env),
        })
    }
}

/// A lesson plus the course ownership facts its video gate needs.
#[derive(Debug, Clone)]
pub struct LessonView {
    pub lesson: Lesson,
    pub course_id: Uuid,
    pub course_seller_id: Uuid,
}

impl LessonView {
    /// The one place authorization reaches into serialization: super
    /// admins, the owning seller and enrolled users get the signed video;
    /// everyone else gets an empty object, not an absent key.
    fn video_obj(&self, env: &RenderEnv) -> Value {
        if !env.viewer.can_view_video(&self.course_id, &self.course_seller_id) {
            return json!({});
        }
        json!({
            "url": self.lesson.video_key,
            "key": env.signer.presigned_get_url(&self.lesson.video_key),
        })
    }
}

impl Projectable for LessonView {
    type Env = RenderEnv;

    fn declared_fields(&self) -> &'static [&'static str] {
        &[
            "id",
            "chapter",
            "title",
            "video_obj",
            "order_no",
            "duration",
            "is_deleted",
            "created_by",
            "updated_by",
            "created_at",
            "updated_at",
        ]
    }

    fn render_field(&self, name: &str, _ctx: &ProjectionContext, env: &RenderEnv) -> Option<Value> {
        let l = &self.lesson;
        let value = match name {
            "id" => json!(l.id),
            "chapter" => json!(l.chapter_id),
            "title" => json!(l.title),
            "video_obj" => self.video_obj(env),
            "order_no" => json!(l.order_no),
            "duration" => json!(format_duration(l.duration_secs)),
            "is_deleted" => json!(l.is_deleted),
            "created_by" => json!(l.created_by),
            "updated_by" => json!(l.updated_by),
            "created_at" => json!(l.created_at),
            "updated_at" => json!(l.updated_at),
            _ => return None,
        };
        Some(value)
    }
}

/// A chapter with its lessons, already ordered by `order_no`.
#[derive(Debug, Clone)]
pub struct ChapterView {
    pub chapter: Chapter,
    pub lessons: Vec<LessonView>,
}

impl ChapterView {
    pub fn lessons_duration_secs(&self) -> i64 {
        self.lessons.iter().map(|l| l.lesson.duration_secs).sum()
    }
}

impl Projectable for ChapterView {
    type Env = RenderEnv;

    fn declared_fields(&self) -> &'static [&'static str] {
        &[
            "id",
            "course",
            "title",
            "order_no",
            "is_deleted",
            "created_by",
            "lessons",
            "updated_by",
            "created_at",
            "updated_at",
            "lesson_summary",
        ]
    }

    fn render_field(&self, name: &str, ctx: &ProjectionContext, env: &RenderEnv) -> Option<Value> {
        let c = &self.chapter;
        let value = match name {
            "id" => json!(c.id),
            "course" => json!(c.course_id),
            "title" => json!(c.title),
            "order_no" => json!(c.order_no),
            "is_deleted" => json!(c.is_deleted),
            "created_by" => json!(c.created_by),
            "lessons" => project_all(&self.lessons, ctx.nested("lessons"), ctx, env),
            "updated_by" => json!(c.updated_by),
            "created_at" => json!(c.created_at),
            "updated_at" => json!(c.updated_at),
            "lesson_summary" => json!({
                "lessons_duration": format_duration(self.lessons_duration_secs()),
                "lesson_count": self.lessons.len(),
            }),
            _ => return None,
        };
        Some(value)
    }
}

/// The full course graph a single serialization walks: the course row plus
/// its resolved relations and aggregates, all loaded up front so rendering
/// stays a pure transform.
#[derive(Debug, Clone)]
pub struct CourseView {
    pub course: Course,
    pub category: Option<CategoryView>,
    pub sub_category: Option<SubCategoryView>,
    pub seller: Option<SellerView>,
    pub chapters: Vec<ChapterView>,
    pub ratings: RatingsSummary,
    pub enrolled_user_count: u64,
}

impl CourseView {
    pub fn lesson_count(&self) -> usize {
        self.chapters.iter().map(|c| c.lessons.len()).sum()
    }

    pub fn duration_secs(&self) -> i64 {
        self.chapters.iter().map(|c| c.lessons_duration_secs()).sum()
    }

    /// A draft is publishable once every content field is filled in and it
    /// actually has chapters and lessons.
    fn is_available_for_published(&self) -> bool {
        let c = &self.course;
        let filled = !c.title.is_empty()
            && c.short_description.is_some()
            && c.description.is_some()
            && c.what_student_learn.is_some()
            && c.requirements.is_some()
            && c.level.is_some()
            && c.audio_language.is_some()
            && c.category_id.is_some()
            && c.sub_category_id.is_some()
            && c.thumbnail_image_key.is_some()
            && c.thumbnail_video_key.is_some()
            && c.course_price.is_some()
            && c.sale_price.is_some();
        filled
            && !self.chapters.is_empty()
            && self.lesson_count() > 0
            && matches!(
                c.course_status,
                crate::models::CourseStatus::Draft | crate::models::CourseStatus::UnPublished
            )
    }
}

impl Projectable for CourseView {
    type Env = RenderEnv;

    fn declared_fields(&self) -> &'static [&'static str] {
        &[
            "id",
            "title",
            "seller",
            "short_description",
            "description",
            "what_student_learn",
            "requirements",
            "level",
            "audio_language",
            "category",
            "sub_category",
            "course_thumbnail_image",
            "is_course_free",
            "course_thumbnail_video",
            "course_price",
            "sale_price",
            "course_status",
            "is_deleted",
            "created_by",
            "category_obj",
            "seller_obj",
            "slug_name",
            "updated_by",
            "created_at",
            "sub_category_obj",
            "updated_at",
            "course_thumbnail_image_key",
            "course_thumbnail_video_key",
            "chapters",
            "chapters_count",
            "lesson_count",
            "ratings_obj",
            "enrolled_user_count",
            "course_duration",
            "is_available_for_published",
        ]
    }

    fn render_field(&self, name: &str, ctx: &ProjectionContext, env: &RenderEnv) -> Option<Value> {
        let c = &self.course;
        let value = match name {
            "id" => json!(c.id),
            "title" => json!(c.title),
            "seller" => json!(c.seller_id),
            "short_description" => json!(c.short_description),
            "description" => json!(c.description),
            "what_student_learn" => json!(c.what_student_learn),
            "requirements" => json!(c.requirements),
            "level" => json!(c.level.map(|l| l.as_str())),
            "audio_language" => json!(c.audio_language),
            "category" => json!(c.category_id),
            "sub_category" => json!(c.sub_category_id),
            "course_thumbnail_image" => signed_url(env, c.thumbnail_image_key.as_deref()),
            "is_course_free" => json!(c.is_course_free),
            "course_thumbnail_video" => signed_url(env, c.thumbnail_video_key.as_deref()),
            "course_price" => json!(c.course_price),
            "sale_price" => json!(c.sale_price),
            "course_status" => json!(c.course_status.as_str()),
            "is_deleted" => json!(c.is_deleted),
            "created_by" => json!(c.created_by),
            "category_obj" => match &self.category {
                Some(category) => project(category, ctx.nested("category_obj"), ctx, env),
                None => Value::Null,
            },
            "seller_obj" => match &self.seller {
                Some(seller) => project(seller, ctx.nested("seller_obj"), ctx, env),
                None => Value::Null,
            },
            "slug_name" => json!(c.slug_name),
            "updated_by" => json!(c.updated_by),
            "created_at" => json!(c.created_at),
            "sub_category_obj" => match &self.sub_category {
                Some(sub) => project(sub, ctx.nested("sub_category_obj"), ctx, env),
                None => Value::Null,
            },
            "updated_at" => json!(c.updated_at),
            "course_thumbnail_image_key" => json!(c.thumbnail_image_key),
            "course_thumbnail_video_key" => json!(c.thumbnail_video_key),
            "chapters" => project_all(&self.chapters, ctx.nested("chapters"), ctx, env),
            "chapters_count" => json!(self.chapters.len()),
            "lesson_count" => json!(self.lesson_count()),
            "ratings_obj" => self.ratings.render(ctx, env),
            "enrolled_user_count" => json!(self.enrolled_user_count),
            "course_duration" => json!(format_duration(self.duration_secs())),
            "is_available_for_published" => json!(self.is_available_for_published()),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Viewer, ViewerUser};
    use crate::models::{Category, CourseStatus, Role};
    use crate::projection::parse_fields;
    use crate::storage::UrlSigner;
    use chrono::Utc;
    use std::sync::Arc;

    struct StaticSigner;

    impl UrlSigner for StaticSigner {
        fn presigned_get_url(&self, media_key: &str) -> Option<String> {
            if media_key.is_empty() {
                None
            } else {
                Some(format!("https://signed.test/{media_key}"))
            }
        }
    }

    fn env_for(viewer: Viewer) -> RenderEnv {
        RenderEnv::new(viewer, Arc::new(StaticSigner))
    }

    fn lesson_view(course_id: Uuid, seller_id: Uuid) -> LessonView {
        let actor = Uuid::new_v4();
        let now = Utc::now();
        LessonView {
            lesson: Lesson {
                id: Uuid::new_v4(),
                chapter_id: Uuid::new_v4(),
                title: "Setup".into(),
                video_key: "videos/setup.mp4".into(),
                order_no: 1,
                duration_secs: 300,
                is_deleted: false,
                created_by: actor,
                updated_by: actor,
                created_at: now,
                updated_at: now,
            },
            course_id,
            course_seller_id: seller_id,
        }
    }

    fn course_view() -> CourseView {
        let actor = Uuid::new_v4();
        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: "Tech".into(),
            is_deleted: false,
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
        };
        CourseView {
            course: Course {
                id: Uuid::new_v4(),
                slug_name: "intro-42".into(),
                seller_id: actor,
                title: "Intro".into(),
                short_description: None,
                description: None,
                what_student_learn: None,
                requirements: None,
                level: None,
                audio_language: None,
                category_id: Some(category.id),
                sub_category_id: None,
                thumbnail_image_key: None,
                thumbnail_video_key: None,
                is_course_free: false,
                course_price: None,
                sale_price: None,
                course_status: CourseStatus::Published,
                is_deleted: false,
                created_by: actor,
                updated_by: actor,
                created_at: now,
                updated_at: now,
            },
            category: Some(CategoryView {
                category,
                sub_categories: vec![],
                available_course_count: 1,
            }),
            sub_category: None,
            seller: None,
            chapters: vec![],
            ratings: RatingsSummary::from_reviews(vec![]),
            enrolled_user_count: 0,
        }
    }

    #[test]
    fn unauthenticated_viewer_gets_empty_video_object() {
        let view = lesson_view(Uuid::new_v4(), Uuid::new_v4());
        let sel = parse_fields(Some("video_obj"));
        let env = env_for(Viewer::anonymous());
        let out = project(&view, sel.top(), &sel.context, &env);
        assert_eq!(out["video_obj"], json!({}));
    }

    #[test]
    fn enrolled_viewer_gets_signed_video() {
        let course_id = Uuid::new_v4();
        let view = lesson_view(course_id, Uuid::new_v4());
        let viewer = Viewer {
            user: Some(ViewerUser {
                id: Uuid::new_v4(),
                roles: vec![Role::Buyer],
                enrolled_course_ids: [course_id].into_iter().collect(),
            }),
        };
        let sel = parse_fields(Some("video_obj"));
        let out = project(&view, sel.top(), &sel.context, &env_for(viewer));
        assert_eq!(out["video_obj"]["url"], json!("videos/setup.mp4"));
        assert_eq!(out["video_obj"]["key"], json!("https://signed.test/videos/setup.mp4"));
    }

    #[test]
    fn nested_selection_limits_category_obj_keys() {
        let view = course_view();
        let sel = parse_fields(Some("title,category_obj__name"));
        let out = project(&view, sel.top(), &sel.context, &env_for(Viewer::anonymous()));

        assert_eq!(out["title"], json!("Intro"));
        let category = out["category_obj"].as_object().unwrap();
        assert_eq!(category.keys().collect::<Vec<_>>(), vec!["name"]);
        assert_eq!(category["name"], json!("Tech"));
        // Nothing else leaked past the selection.
        assert_eq!(out.as_object().unwrap().len(), 2);
    }

    #[test]
    fn null_sub_category_projects_to_null() {
        let view = course_view();
        let sel = parse_fields(Some("sub_category_obj__name"));
        let out = project(&view, sel.top(), &sel.context, &env_for(Viewer::anonymous()));
        assert_eq!(out["sub_category_obj"], Value::Null);
    }

    #[test]
    fn ratings_summary_math() {
        let now = Utc::now();
        let actor = Uuid::new_v4();
        let review = |stars: i32| RatingWithUser {
            id: Uuid::new_v4(),
            course_id: actor,
            user_id: actor,
            rating: stars,
            title: "t".into(),
            description: None,
            user_first_name: "A".into(),
            user_last_name: "B".into(),
            user_profile_image_key: None,
            is_deleted: false,
            created_by: actor,
            updated_by: actor,
            created_at: now,
            updated_at: now,
        };

        let summary = RatingsSummary::from_reviews(vec![review(5), review(4), review(4), review(1)]);
        assert_eq!(summary.total_reviews_count, 4);
        assert_eq!(summary.total_rating, 3.5);
        assert_eq!(summary.star_percentage, [25, 0, 0, 50, 25]);

        let empty = RatingsSummary::from_reviews(vec![]);
        assert_eq!(empty.total_rating, 0.0);
        assert_eq!(empty.star_percentage, [0; 5]);
    }
}
