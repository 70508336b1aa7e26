use serde::Serialize;
use serde_json::{json, Value};

use crate::models::{Category, CourseSummary, SellerWithUser, SubCategory};

pub const DURATION_4H_SECS: i64 = 4 * 3600;
pub const DURATION_7H_SECS: i64 = 7 * 3600;
pub const DURATION_20H_SECS: i64 = 20 * 3600;

/// One count bucket in a facet list. The leading bucket of every facet is
/// the synthetic `All` entry with `value: 0`.
#[derive(Debug, Clone, Serialize)]
pub struct FacetBucket {
    pub label: String,
    pub value: Value,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<Vec<FacetBucket>>,
}

impl FacetBucket {
    fn new(label: impl Into<String>, value: Value, count: u64) -> Self {
        Self { label: label.into(), value, count, subcategory: None }
    }

    fn all(count: u64) -> Self {
        Self::new("All", json!(0), count)
    }
}

/// Compute the four facet lists for an already-filtered course set.
///
/// The four passes are independent counts over the same rows. Category,
/// seller and duration buckets partition the set, so their `All` count is
/// the sum of the other buckets; the rating bands are cumulative and
/// overlap, so `All` there is the total filtered count instead.
pub fn aggregate(
    rows: &[CourseSummary],
    categories: &[Category],
    sub_categories: &[SubCategory],
    sellers: &[SellerWithUser],
) -> Value {
    json!({
        "category": category_facet(rows, categories, sub_categories),
        "rating": rating_facet(rows),
        "seller": seller_facet(rows, sellers),
        "duration": duration_facet(rows),
    })
}

/// One bucket per category in the full taxonomy (ordered by name), each
/// carrying its sub-category breakdown scoped to that category.
pub fn category_facet(
    rows: &[CourseSummary],
    categories: &[Category],
    sub_categories: &[SubCategory],
) -> Vec<FacetBucket> {
    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by(|a, b| a.name.cmp(&b.name));

    let mut buckets = Vec::with_capacity(ordered.len() + 1);
    let mut total = 0u64;
    for category in ordered {
        let count = rows.iter().filter(|r| r.category_id == Some(category.id)).count() as u64;
        total += count;

        let nested: Vec<FacetBucket> = sub_categories
            .iter()
            .filter(|sc| sc.category_id == category.id)
            .map(|sc| {
                let sc_count =
                    rows.iter().filter(|r| r.sub_category_id == Some(sc.id)).count() as u64;
                FacetBucket::new(sc.name.clone(), json!(sc.id), sc_count)
            })
            .collect();

        let mut bucket = FacetBucket::new(category.name.clone(), json!(category.id), count);
        bucket.subcategory = Some(nested);
        buckets.push(bucket);
    }

    buckets.insert(0, FacetBucket::all(total));
    buckets
}

/// Cumulative minimum-average-rating bands. A course with a 5.0 average
/// counts in all four, so the leading `All` bucket is the total filtered
/// count rather than a sum.
pub fn rating_facet(rows: &[CourseSummary]) -> Vec<FacetBucket> {
    let at_least = |threshold: f64| rows.iter().filter(|r| r.avg_rating >= threshold).count() as u64;

    vec![
        FacetBucket::all(rows.len() as u64),
        FacetBucket::new("4.5", json!(4.5), at_least(4.5)),
        FacetBucket::new("4", json!(4), at_least(4.0)),
        FacetBucket::new("3.5", json!(3.5), at_least(3.5)),
        FacetBucket::new("3", json!(3), at_least(3.0)),
    ]
}

/// One bucket per seller, ordered by display name. Attribution is disjoint,
/// so `All` is the sum across sellers.
pub fn seller_facet(rows: &[CourseSummary], sellers: &[SellerWithUser]) -> Vec<FacetBucket> {
    let mut labeled: Vec<(String, &SellerWithUser)> = sellers
        .iter()
        .map(|s| (format!("{} {}", s.user_first_name, s.user_last_name), s))
        .collect();
    labeled.sort_by(|a, b| a.0.cmp(&b.0));

    let mut buckets = Vec::with_capacity(labeled.len() + 1);
    let mut total = 0u64;
    for (label, seller) in labeled {
        let count = rows.iter().filter(|r| r.seller_id == seller.user_id).count() as u64;
        total += count;
        buckets.push(FacetBucket::new(label, json!(seller.user_id), count));
    }

    buckets.insert(0, FacetBucket::all(total));
    buckets
}

/// Disjoint, exhaustive total-duration bands, so `All` is the sum of the
/// four band counts.
pub fn duration_facet(rows: &[CourseSummary]) -> Vec<FacetBucket> {
    let under_4 = rows.iter().filter(|r| r.duration_secs < DURATION_4H_SECS).count() as u64;
    let from_4_to_7 = rows
        .iter()
        .filter(|r| r.duration_secs >= DURATION_4H_SECS && r.duration_secs < DURATION_7H_SECS)
        .count() as u64;
    let from_7_to_20 = rows
        .iter()
        .filter(|r| r.duration_secs >= DURATION_7H_SECS && r.duration_secs < DURATION_20H_SECS)
        .count() as u64;
    let over_20 = rows.iter().filter(|r| r.duration_secs >= DURATION_20H_SECS).count() as u64;

    vec![
        FacetBucket::all(under_4 + from_4_to_7 + from_7_to_20 + over_20),
        FacetBucket::new("Less than 4 hours", json!("4"), under_4),
        FacetBucket::new("4 - 7 hours", json!("4-7"), from_4_to_7),
        FacetBucket::new("7 - 20 hours", json!("7-20"), from_7_to_20),
        FacetBucket::new("20 + hours", json!("20"), over_20),
    ]
}
