//! Wire shapes for the read API.
//!
//! Each view is a read-only snapshot assembled by a service, implementing
//! [`Projectable`](crate::projection::Projectable) so the caller's `fields`
//! selection decides what actually gets rendered.

pub mod catalog;
pub mod course;
pub mod seller;

use std::sync::Arc;

pub use catalog::{CategoryView, SubCategoryView};
pub use course::{ChapterView, CourseView, LessonView, RatingView, RatingsSummary};
pub use seller::SellerView;

use serde_json::Value;

use crate::auth::Viewer;
use crate::storage::UrlSigner;

/// Request-scoped collaborators the serializers render against: who is
/// looking, and how media keys become URLs.
#[derive(Clone)]
pub struct RenderEnv {
    pub viewer: Viewer,
    pub signer: Arc<dyn UrlSigner>,
}

impl RenderEnv {
    pub fn new(viewer: Viewer, signer: Arc<dyn UrlSigner>) -> Self {
        Self { viewer, signer }
    }
}

/// Pre-signed URL for an optional media key, `null` when there is nothing
/// to sign.
pub(crate) fn signed_url(env: &RenderEnv, key: Option<&str>) -> Value {
    match key.and_then(|k| env.signer.presigned_get_url(k)) {
        Some(url) => Value::String(url),
        None => Value::Null,
    }
}

/// Lesson/course durations are rendered as unpadded `H:M:S`, with `00:00`
/// standing in for "no content yet".
pub(crate) fn format_duration(total_secs: i64) -> String {
    if total_secs <= 0 {
        return "00:00".to_string();
    }
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{}:{}:{}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "00:00");
        assert_eq!(format_duration(-5), "00:00");
        assert_eq!(format_duration(59), "0:0:59");
        assert_eq!(format_duration(3661), "1:1:1");
        // Past a day the hours just keep counting.
        assert_eq!(format_duration(26 * 3600 + 90), "26:1:30");
    }
}
