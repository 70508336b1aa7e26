use serde_json::{json, Value};

use crate::models::SellerWithUser;
use crate::projection::{Projectable, ProjectionContext};

use super::RenderEnv;

/// Seller profile with the storefront aggregates.
#[derive(Debug, Clone)]
pub struct SellerView {
    pub seller: SellerWithUser,
    pub total_rating: f64,
    pub total_reviews_count: u64,
    pub student_count: u64,
    pub courses_count: u64,
}

impl Projectable for SellerView {
    type Env = RenderEnv;

    fn declared_fields(&self) -> &'static [&'static str] {
        &[
            "id",
            "seller_id",
            "designation",
            "user_first_name",
            "user_last_name",
            "user_email",
            "facebook_link",
            "instagram_link",
            "slug_name",
            "linkedin_link",
            "twitter_link",
            "description",
            "ratings",
            "student_count",
            "courses_count",
        ]
    }

    fn render_field(&self, name: &str, _ctx: &ProjectionContext, _env: &RenderEnv) -> Option<Value> {
        let s = &self.seller;
        let value = match name {
            "id" => json!(s.id),
            "seller_id" => json!(s.user_id),
            "designation" => json!(s.designation),
            "user_first_name" => json!(s.user_first_name),
            "user_last_name" => json!(s.user_last_name),
            "user_email" => json!(s.user_email),
            "facebook_link" => json!(s.facebook_link),
            "instagram_link" => json!(s.instagram_link),
            "slug_name" => json!(s.slug_name),
            "linkedin_link" => json!(s.linkedin_link),
            "twitter_link" => json!(s.twitter_link),
            "description" => json!(s.description),
            "ratings" => json!({
                "total_rating": self.total_rating,
                "total_reviews_count": self.total_reviews_count,
            }),
            "student_count" => json!(self.student_count),
            "courses_count" => json!(self.courses_count),
            _ => return None,
        };
        Some(value)
    }
}
