use serde_json::{json, Value};

use crate::models::{Category, SubCategory};
use crate::projection::{project_all, Projectable, ProjectionContext};

use super::RenderEnv;

/// Category with its sub-category breakdown and published-course count.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub category: Category,
    pub sub_categories: Vec<SubCategoryView>,
    pub available_course_count: u64,
}

impl Projectable for CategoryView {
    type Env = RenderEnv;

    fn declared_fields(&self) -> &'static [&'static str] {
        &[
            "id",
            "name",
            "value",
            "sub_category",
            "is_deleted",
            "created_by",
            "updated_by",
            "created_at",
            "updated_at",
            "available_course_count",
        ]
    }

    fn render_field(&self, name: &str, ctx: &ProjectionContext, env: &RenderEnv) -> Option<Value> {
        let c = &self.category;
        let value = match name {
            "id" => json!(c.id),
            "name" => json!(c.name),
            "value" => json!(c.id),
            "sub_category" => {
                project_all(&self.sub_categories, ctx.nested("sub_category"), ctx, env)
            }
            "is_deleted" => json!(c.is_deleted),
            "created_by" => json!(c.created_by),
            "updated_by" => json!(c.updated_by),
            "created_at" => json!(c.created_at),
            "updated_at" => json!(c.updated_at),
            "available_course_count" => json!(self.available_course_count),
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Clone)]
pub struct SubCategoryView {
    pub sub_category: SubCategory,
}

impl Projectable for SubCategoryView {
    type Env = RenderEnv;

    fn declared_fields(&self) -> &'static [&'static str] {
        &[
            "id",
            "name",
            "value",
            "category",
            "category_name",
            "is_deleted",
            "created_by",
            "updated_by",
            "category_id",
            "created_at",
            "updated_at",
        ]
    }

    fn render_field(&self, name: &str, _ctx: &ProjectionContext, _env: &RenderEnv) -> Option<Value> {
        let sc = &self.sub_category;
        let value = match name {
            "id" => json!(sc.id),
            "name" => json!(sc.name),
            "value" => json!(sc.id),
            "category" | "category_id" => json!(sc.category_id),
            "category_name" => json!(sc.category_name),
            "is_deleted" => json!(sc.is_deleted),
            "created_by" => json!(sc.created_by),
            "updated_by" => json!(sc.updated_by),
            "created_at" => json!(sc.created_at),
            "updated_at" => json!(sc.updated_at),
            _ => return None,
        };
        Some(value)
    }
}
