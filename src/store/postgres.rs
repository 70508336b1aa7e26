use std::collections::HashSet;
use std::time::Duration;

use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::config;
use crate::models::{
    Category, Chapter, Course, CourseLevel, CourseStatus, CourseSummary, Lesson, RatingWithUser,
    Role, SellerWithUser, SubCategory, User, UserStatus,
};

use super::traits::{CatalogStore, StoreError, StoreResult};

const COURSE_SUMMARY_SQL: &str = r#"
SELECT c.id, c.title, c.seller_id, c.category_id, c.sub_category_id, c.sale_price, c.created_at,
       COALESCE(r.avg_rating, 0)::float8 AS avg_rating,
       COALESCE(d.duration_secs, 0)::bigint AS duration_secs
FROM courses c
LEFT JOIN (
    SELECT course_id, AVG(rating) AS avg_rating
    FROM course_ratings
    WHERE is_deleted = FALSE
    GROUP BY course_id
) r ON r.course_id = c.id
LEFT JOIN (
    SELECT ch.course_id, SUM(l.duration_secs) AS duration_secs
    FROM course_chapters ch
    JOIN course_lessons l ON l.chapter_id = ch.id AND l.is_deleted = FALSE
    WHERE ch.is_deleted = FALSE
    GROUP BY ch.course_id
) d ON d.course_id = c.id
WHERE c.course_status = 'PUBLISHED' AND c.is_deleted = FALSE
ORDER BY c.created_at
"#;

const SELLER_SQL: &str = r#"
SELECT s.id, s.user_id, s.slug_name, s.designation, s.description,
       s.facebook_link, s.twitter_link, s.instagram_link, s.linkedin_link,
       u.first_name AS user_first_name, u.last_name AS user_last_name,
       u.email AS user_email,
       s.is_deleted, s.created_at, s.updated_at
FROM seller_profiles s
JOIN users u ON u.id = s.user_id
WHERE s.is_deleted = FALSE
"#;

/// Postgres-backed [`CatalogStore`]. All queries are runtime-built single
/// round trips; the ordering contracts live in the SQL.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let db_config = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections)
            .acquire_timeout(Duration::from_secs(db_config.connection_timeout))
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id, name, is_deleted, created_by, updated_by, created_at, updated_at
             FROM course_categories WHERE is_deleted = FALSE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_sub_categories(&self, category: Option<&Uuid>) -> StoreResult<Vec<SubCategory>> {
        let base = "SELECT sc.id, sc.name, sc.category_id, c.name AS category_name,
                           sc.is_deleted, sc.created_by, sc.updated_by, sc.created_at, sc.updated_at
                    FROM course_sub_categories sc
                    JOIN course_categories c ON c.id = sc.category_id
                    WHERE sc.is_deleted = FALSE";
        let rows = match category {
            Some(id) => {
                sqlx::query(&format!("{base} AND sc.category_id = $1 ORDER BY sc.name"))
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                sqlx::query(&format!("{base} ORDER BY sc.name")).fetch_all(&self.pool).await?
            }
        };
        rows.iter().map(map_sub_category).collect()
    }

    async fn get_category(&self, id: &Uuid) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, name, is_deleted, created_by, updated_by, created_at, updated_at
             FROM course_categories WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_sub_category(&self, id: &Uuid) -> StoreResult<Option<SubCategory>> {
        let row = sqlx::query(
            "SELECT sc.id, sc.name, sc.category_id, c.name AS category_name,
                    sc.is_deleted, sc.created_by, sc.updated_by, sc.created_at, sc.updated_at
             FROM course_sub_categories sc
             JOIN course_categories c ON c.id = sc.category_id
             WHERE sc.id = $1 AND sc.is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_sub_category).transpose()
    }

    async fn published_course_summaries(&self) -> StoreResult<Vec<CourseSummary>> {
        let rows = sqlx::query(COURSE_SUMMARY_SQL).fetch_all(&self.pool).await?;
        rows.iter().map(map_course_summary).collect()
    }

    async fn list_published_courses(&self) -> StoreResult<Vec<Course>> {
        let rows = sqlx::query(
            "SELECT id, slug_name, seller_id, title, short_description, description,
                    what_student_learn, requirements, level, audio_language,
                    category_id, sub_category_id, thumbnail_image_key, thumbnail_video_key,
                    is_course_free, course_price, sale_price, course_status,
                    is_deleted, created_by, updated_by, created_at, updated_at
             FROM courses
             WHERE course_status = 'PUBLISHED' AND is_deleted = FALSE
             ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_course).collect()
    }

    async fn get_course(&self, id: &Uuid) -> StoreResult<Option<Course>> {
        let row = sqlx::query(
            "SELECT id, slug_name, seller_id, title, short_description, description,
                    what_student_learn, requirements, level, audio_language,
                    category_id, sub_category_id, thumbnail_image_key, thumbnail_video_key,
                    is_course_free, course_price, sale_price, course_status,
                    is_deleted, created_by, updated_by, created_at, updated_at
             FROM courses WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_course).transpose()
    }

    async fn list_chapters(&self, course: &Uuid) -> StoreResult<Vec<Chapter>> {
        let rows = sqlx::query_as::<_, Chapter>(
            "SELECT id, course_id, title, order_no, is_deleted, created_by, updated_by,
                    created_at, updated_at
             FROM course_chapters
             WHERE course_id = $1 AND is_deleted = FALSE ORDER BY order_no",
        )
        .bind(course)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_chapter(&self, id: &Uuid) -> StoreResult<Option<Chapter>> {
        let row = sqlx::query_as::<_, Chapter>(
            "SELECT id, course_id, title, order_no, is_deleted, created_by, updated_by,
                    created_at, updated_at
             FROM course_chapters WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn list_lessons(&self, chapter: &Uuid) -> StoreResult<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, Lesson>(
            "SELECT id, chapter_id, title, video_key, order_no, duration_secs,
                    is_deleted, created_by, updated_by, created_at, updated_at
             FROM course_lessons
             WHERE chapter_id = $1 AND is_deleted = FALSE ORDER BY order_no",
        )
        .bind(chapter)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_course_ratings(&self, course: &Uuid) -> StoreResult<Vec<RatingWithUser>> {
        let rows = sqlx::query_as::<_, RatingWithUser>(
            "SELECT r.id, r.course_id, r.user_id, r.rating, r.title, r.description,
                    u.first_name AS user_first_name, u.last_name AS user_last_name,
                    u.profile_image_key AS user_profile_image_key,
                    r.is_deleted, r.created_by, r.updated_by, r.created_at, r.updated_at
             FROM course_ratings r
             JOIN users u ON u.id = r.user_id
             WHERE r.course_id = $1 AND r.is_deleted = FALSE
             ORDER BY r.created_at DESC",
        )
        .bind(course)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn enrollment_count(&self, course: &Uuid) -> StoreResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM enrolled_courses WHERE course_id = $1")
            .bind(course)
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count as u64)
    }

    async fn enrolled_course_ids(&self, user: &Uuid) -> StoreResult<HashSet<Uuid>> {
        let rows = sqlx::query("SELECT course_id FROM enrolled_courses WHERE user_id = $1")
            .bind(user)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(|row| row.try_get::<Uuid, _>("course_id").map_err(Into::into)).collect()
    }

    async fn get_user(&self, id: &Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, email, password_hash, status, roles,
                    profile_image_key, date_joined
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, email, password_hash, status, roles,
                    profile_image_key, date_joined
             FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_user).transpose()
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let roles = serde_json::to_value(&user.roles)
            .map_err(|e| StoreError::Query(format!("roles encoding failed: {e}")))?;
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, status, roles,
                                profile_image_key, date_joined)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.status.as_str())
        .bind(roles)
        .bind(&user.profile_image_key)
        .bind(user.date_joined)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_sellers(&self) -> StoreResult<Vec<SellerWithUser>> {
        let sql = format!("{SELLER_SQL} ORDER BY u.first_name, u.last_name");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(map_seller).collect()
    }

    async fn get_seller(&self, user_id: &Uuid) -> StoreResult<Option<SellerWithUser>> {
        let sql = format!("{SELLER_SQL} AND s.user_id = $1");
        let row = sqlx::query(&sql).bind(user_id).fetch_optional(&self.pool).await?;
        row.as_ref().map(map_seller).transpose()
    }

    async fn revoke_token(&self, token: &str) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO revoked_tokens (token, revoked_at) VALUES ($1, NOW())
             ON CONFLICT (token) DO NOTHING",
        )
        .bind(token)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_token_revoked(&self, token: &str) -> StoreResult<bool> {
        let row =
            sqlx::query("SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token = $1) AS revoked")
                .bind(token)
                .fetch_one(&self.pool)
                .await?;
        let revoked: bool = row.try_get("revoked")?;
        Ok(revoked)
    }
}

fn map_sub_category(row: &PgRow) -> StoreResult<SubCategory> {
    Ok(SubCategory {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category_id: row.try_get("category_id")?,
        category_name: row.try_get("category_name")?,
        is_deleted: row.try_get("is_deleted")?,
        created_by: row.try_get("created_by")?,
        updated_by: row.try_get("updated_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_course_summary(row: &PgRow) -> StoreResult<CourseSummary> {
    Ok(CourseSummary {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        seller_id: row.try_get("seller_id")?,
        category_id: row.try_get("category_id")?,
        sub_category_id: row.try_get("sub_category_id")?,
        sale_price: row.try_get::<Option<Decimal>, _>("sale_price")?,
        avg_rating: row.try_get("avg_rating")?,
        duration_secs: row.try_get("duration_secs")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_course(row: &PgRow) -> StoreResult<Course> {
    let status: String = row.try_get("course_status")?;
    let course_status = CourseStatus::parse(&status)
        .ok_or_else(|| StoreError::Query(format!("unknown course status: {status}")))?;
    let level = row
        .try_get::<Option<String>, _>("level")?
        .as_deref()
        .and_then(CourseLevel::parse);

    Ok(Course {
        id: row.try_get("id")?,
        slug_name: row.try_get("slug_name")?,
        seller_id: row.try_get("seller_id")?,
        title: row.try_get("title")?,
        short_description: row.try_get("short_description")?,
        description: row.try_get("description")?,
        what_student_learn: row.try_get("what_student_learn")?,
        requirements: row.try_get("requirements")?,
        level,
        audio_language: row.try_get("audio_language")?,
        category_id: row.try_get("category_id")?,
        sub_category_id: row.try_get("sub_category_id")?,
        thumbnail_image_key: row.try_get("thumbnail_image_key")?,
        thumbnail_video_key: row.try_get("thumbnail_video_key")?,
        is_course_free: row.try_get("is_course_free")?,
        course_price: row.try_get::<Option<Decimal>, _>("course_price")?,
        sale_price: row.try_get::<Option<Decimal>, _>("sale_price")?,
        course_status,
        is_deleted: row.try_get("is_deleted")?,
        created_by: row.try_get("created_by")?,
        updated_by: row.try_get("updated_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_user(row: &PgRow) -> StoreResult<User> {
    let status: String = row.try_get("status")?;
    let status = UserStatus::parse(&status)
        .ok_or_else(|| StoreError::Query(format!("unknown user status: {status}")))?;
    let roles: Vec<Role> = serde_json::from_value(row.try_get("roles")?)
        .map_err(|e| StoreError::Query(format!("roles decoding failed: {e}")))?;

    Ok(User {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        status,
        roles,
        profile_image_key: row.try_get("profile_image_key")?,
        date_joined: row.try_get("date_joined")?,
    })
}

fn map_seller(row: &PgRow) -> StoreResult<SellerWithUser> {
    Ok(SellerWithUser {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        slug_name: row.try_get("slug_name")?,
        designation: row.try_get("designation")?,
        description: row.try_get("description")?,
        facebook_link: row.try_get("facebook_link")?,
        twitter_link: row.try_get("twitter_link")?,
        instagram_link: row.try_get("instagram_link")?,
        linkedin_link: row.try_get("linkedin_link")?,
        user_first_name: row.try_get("user_first_name")?,
        user_last_name: row.try_get("user_last_name")?,
        user_email: row.try_get("user_email")?,
        is_deleted: row.try_get("is_deleted")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
