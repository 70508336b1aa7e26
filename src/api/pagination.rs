use serde::Deserialize;
use serde_json::{json, Value};

/// Pagination switches as they arrive on the query string. Pagination is
/// opt-in per request; the page size comes from configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub pagination: Option<String>,
    pub page: Option<usize>,
}

impl PageQuery {
    pub fn enabled(&self) -> bool {
        matches!(self.pagination.as_deref(), Some("true") | Some("True"))
    }
}

/// Wrap projected items in the pagination envelope when the caller asked
/// for it; otherwise hand back the plain array.
pub fn paginate(items: Vec<Value>, query: &PageQuery, page_size: usize) -> Value {
    if !query.enabled() || page_size == 0 {
        return Value::Array(items);
    }

    let count = items.len();
    let total_pages = std::cmp::max(1, (count + page_size - 1) / page_size);
    let current = query.page.unwrap_or(1).clamp(1, total_pages);
    let results: Vec<Value> =
        items.into_iter().skip((current - 1) * page_size).take(page_size).collect();

    json!({
        "links": {
            "total_pages": total_pages,
            "next": if current < total_pages { json!(current + 1) } else { Value::Null },
            "current": current,
            "previous": if current > 1 { json!(current - 1) } else { Value::Null },
        },
        "count": count,
        "results": results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<Value> {
        (0..n).map(|i| json!(i)).collect()
    }

    #[test]
    fn disabled_by_default() {
        let out = paginate(items(3), &PageQuery::default(), 15);
        assert_eq!(out, json!([0, 1, 2]));
    }

    #[test]
    fn first_page_with_links() {
        let query = PageQuery { pagination: Some("true".into()), page: None };
        let out = paginate(items(20), &query, 15);
        assert_eq!(out["count"], json!(20));
        assert_eq!(out["links"]["total_pages"], json!(2));
        assert_eq!(out["links"]["current"], json!(1));
        assert_eq!(out["links"]["next"], json!(2));
        assert_eq!(out["links"]["previous"], Value::Null);
        assert_eq!(out["results"].as_array().unwrap().len(), 15);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let query = PageQuery { pagination: Some("True".into()), page: Some(99) };
        let out = paginate(items(20), &query, 15);
        assert_eq!(out["links"]["current"], json!(2));
        assert_eq!(out["links"]["next"], Value::Null);
        assert_eq!(out["results"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn empty_set_still_reports_one_page() {
        let query = PageQuery { pagination: Some("true".into()), page: None };
        let out = paginate(items(0), &query, 15);
        assert_eq!(out["count"], json!(0));
        assert_eq!(out["links"]["total_pages"], json!(1));
        assert!(out["results"].as_array().unwrap().is_empty());
    }
}
