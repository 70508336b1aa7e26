use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    Draft,
    Pending,
    Published,
    UnPublished,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Draft => "DRAFT",
            CourseStatus::Pending => "PENDING",
            CourseStatus::Published => "PUBLISHED",
            CourseStatus::UnPublished => "UN_PUBLISHED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(CourseStatus::Draft),
            "PENDING" => Some(CourseStatus::Pending),
            "PUBLISHED" => Some(CourseStatus::Published),
            "UN_PUBLISHED" => Some(CourseStatus::UnPublished),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Beginner => "BEGINNER",
            CourseLevel::Intermediate => "INTERMEDIATE",
            CourseLevel::Expert => "EXPERT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "BEGINNER" => Some(CourseLevel::Beginner),
            "INTERMEDIATE" => Some(CourseLevel::Intermediate),
            "EXPERT" => Some(CourseLevel::Expert),
            _ => None,
        }
    }
}

/// Full course record as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub slug_name: String,
    pub seller_id: Uuid,
    pub title: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub what_student_learn: Option<String>,
    pub requirements: Option<String>,
    pub level: Option<CourseLevel>,
    pub audio_language: Option<String>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub thumbnail_image_key: Option<String>,
    pub thumbnail_video_key: Option<String>,
    pub is_course_free: bool,
    pub course_price: Option<Decimal>,
    pub sale_price: Option<Decimal>,
    pub course_status: CourseStatus,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Annotated row the catalog search and facet passes work over: the course
/// key columns plus the two aggregates (average rating, total lesson
/// duration) the refinement UI filters on. Ordering from the store is
/// `created_at` ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: Uuid,
    pub title: String,
    pub seller_id: Uuid,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub sale_price: Option<Decimal>,
    /// 0.0 when the course has no ratings yet.
    pub avg_rating: f64,
    /// Total lesson duration in seconds; 0 when the course has no lessons.
    pub duration_secs: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub order_no: i32,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub title: String,
    /// Storage key of the lesson video; never exposed raw to anonymous
    /// callers.
    pub video_key: String,
    pub order_no: i32,
    pub duration_secs: i64,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A course rating joined with the reviewer's display fields, the shape the
/// review list is served in (`created_at` descending).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RatingWithUser {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub title: String,
    pub description: Option<String>,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_profile_image_key: Option<String>,
    pub is_deleted: bool,
    pub created_by: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub id: Uuid,
    pub course_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
