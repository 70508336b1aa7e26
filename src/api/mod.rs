pub mod pagination;
pub mod routes;

use axum::Json;
use serde_json::{json, Value};

pub use pagination::{paginate, PageQuery};

/// Standard success envelope every endpoint responds with.
pub fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}
