use serde::Deserialize;
use uuid::Uuid;

use crate::facets::{DURATION_20H_SECS, DURATION_4H_SECS, DURATION_7H_SECS};
use crate::models::CourseSummary;

/// Raw course-search refinement parameters as they arrive on the query
/// string. Id lists are comma-separated; `duration` is a band key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilterParams {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub seller: Option<String>,
    pub rating: Option<f64>,
    pub duration: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

/// Total-duration refinement band. The four bands partition the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationBand {
    Under4h,
    From4hTo7h,
    From7hTo20h,
    Over20h,
}

impl DurationBand {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "4" => Some(DurationBand::Under4h),
            "4-7" => Some(DurationBand::From4hTo7h),
            "7-20" => Some(DurationBand::From7hTo20h),
            "20" => Some(DurationBand::Over20h),
            _ => None,
        }
    }

    pub fn contains(&self, duration_secs: i64) -> bool {
        match self {
            DurationBand::Under4h => duration_secs < DURATION_4H_SECS,
            DurationBand::From4hTo7h => {
                duration_secs >= DURATION_4H_SECS && duration_secs < DURATION_7H_SECS
            }
            DurationBand::From7hTo20h => {
                duration_secs >= DURATION_7H_SECS && duration_secs < DURATION_20H_SECS
            }
            DurationBand::Over20h => duration_secs >= DURATION_20H_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    SalePrice,
    Duration,
    Rating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parsed, typed course filter. Construction is fail-open: tokens that do
/// not parse (bad uuids, unknown band keys, unknown ordering columns) are
/// dropped rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct CourseFilter {
    categories: Vec<Uuid>,
    sub_categories: Vec<Uuid>,
    sellers: Vec<Uuid>,
    min_rating: Option<f64>,
    duration: Option<DurationBand>,
    search: Option<String>,
    order: Option<(OrderKey, SortDirection)>,
}

impl CourseFilter {
    pub fn from_params(params: &CourseFilterParams) -> Self {
        Self {
            categories: parse_id_list(params.category.as_deref()),
            sub_categories: parse_id_list(params.subcategory.as_deref()),
            sellers: parse_id_list(params.seller.as_deref()),
            min_rating: params.rating,
            duration: params.duration.as_deref().and_then(DurationBand::parse),
            search: params
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            order: params.ordering.as_deref().and_then(parse_ordering),
        }
    }

    pub fn matches(&self, row: &CourseSummary) -> bool {
        if !self.categories.is_empty()
            && !row.category_id.map_or(false, |id| self.categories.contains(&id))
        {
            return false;
        }
        if !self.sub_categories.is_empty()
            && !row.sub_category_id.map_or(false, |id| self.sub_categories.contains(&id))
        {
            return false;
        }
        if !self.sellers.is_empty() && !self.sellers.contains(&row.seller_id) {
            return false;
        }
        if let Some(min) = self.min_rating {
            if row.avg_rating < min {
                return false;
            }
        }
        if let Some(band) = self.duration {
            if !band.contains(row.duration_secs) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            if !row.title.to_lowercase().contains(needle) {
                return false;
            }
        }
        true
    }

    /// Filter and order the rows. Without an explicit ordering the upstream
    /// `created_at` ascending order is kept; the sort is stable so ties
    /// under an explicit key also keep it.
    pub fn apply(&self, mut rows: Vec<CourseSummary>) -> Vec<CourseSummary> {
        rows.retain(|row| self.matches(row));

        if let Some((key, direction)) = self.order {
            rows.sort_by(|a, b| {
                let ord = match key {
                    OrderKey::SalePrice => a.sale_price.cmp(&b.sale_price),
                    OrderKey::Duration => a.duration_secs.cmp(&b.duration_secs),
                    OrderKey::Rating => a.avg_rating.total_cmp(&b.avg_rating),
                };
                match direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }
        rows
    }
}

fn parse_id_list(raw: Option<&str>) -> Vec<Uuid> {
    raw.map(|s| s.split(',').filter_map(|tok| Uuid::parse_str(tok.trim()).ok()).collect())
        .unwrap_or_default()
}

fn parse_ordering(raw: &str) -> Option<(OrderKey, SortDirection)> {
    let (column, direction) = match raw.strip_prefix('-') {
        Some(rest) => (rest, SortDirection::Desc),
        None => (raw, SortDirection::Asc),
    };
    let key = match column.trim() {
        "sale_price" => OrderKey::SalePrice,
        "duration" => OrderKey::Duration,
        "rating" => OrderKey::Rating,
        _ => return None,
    };
    Some((key, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn row(title: &str, rating: f64, duration_secs: i64, price: i64) -> CourseSummary {
        CourseSummary {
            id: Uuid::new_v4(),
            title: title.into(),
            seller_id: Uuid::new_v4(),
            category_id: None,
            sub_category_id: None,
            sale_price: Some(Decimal::new(price, 0)),
            avg_rating: rating,
            duration_secs,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn bad_tokens_are_dropped_not_fatal() {
        let params = CourseFilterParams {
            category: Some("not-a-uuid,also-bad".into()),
            duration: Some("99".into()),
            ordering: Some("popularity".into()),
            ..Default::default()
        };
        let filter = CourseFilter::from_params(&params);
        // Everything unparseable fell away, leaving an unrestricted filter.
        assert!(filter.matches(&row("any", 0.0, 0, 10)));
    }

    #[test]
    fn category_list_restricts_membership() {
        let id = Uuid::new_v4();
        let params =
            CourseFilterParams { category: Some(id.to_string()), ..Default::default() };
        let filter = CourseFilter::from_params(&params);

        let mut inside = row("a", 0.0, 0, 10);
        inside.category_id = Some(id);
        let outside = row("b", 0.0, 0, 10);
        assert!(filter.matches(&inside));
        assert!(!filter.matches(&outside));
    }

    #[test]
    fn rating_and_duration_band_combine() {
        let params = CourseFilterParams {
            rating: Some(4.0),
            duration: Some("4-7".into()),
            ..Default::default()
        };
        let filter = CourseFilter::from_params(&params);

        assert!(filter.matches(&row("ok", 4.2, DURATION_4H_SECS, 10)));
        assert!(!filter.matches(&row("low rating", 3.9, DURATION_4H_SECS, 10)));
        assert!(!filter.matches(&row("too long", 4.2, DURATION_7H_SECS, 10)));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let params = CourseFilterParams { search: Some("RUST".into()), ..Default::default() };
        let filter = CourseFilter::from_params(&params);
        assert!(filter.matches(&row("Advanced Rust Patterns", 0.0, 0, 10)));
        assert!(!filter.matches(&row("Intro to Go", 0.0, 0, 10)));
    }

    #[test]
    fn descending_price_ordering() {
        let params =
            CourseFilterParams { ordering: Some("-sale_price".into()), ..Default::default() };
        let filter = CourseFilter::from_params(&params);
        let rows = filter.apply(vec![
            row("cheap", 0.0, 0, 5),
            row("dear", 0.0, 0, 50),
            row("mid", 0.0, 0, 20),
        ]);
        let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["dear", "mid", "cheap"]);
    }
}
