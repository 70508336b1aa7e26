use futures::try_join;
use serde_json::Value;

use crate::facets;
use crate::filter::CourseFilter;
use crate::store::{CatalogStore, StoreResult};

/// Run the four facet counting passes for the course set surviving
/// `filter`. The inputs are loaded concurrently; the counting itself is
/// pure and happens in [`facets::aggregate`].
pub async fn facet_counts(
    store: &dyn CatalogStore,
    filter: &CourseFilter,
) -> StoreResult<Value> {
    let (summaries, categories, sub_categories, sellers) = try_join!(
        store.published_course_summaries(),
        store.list_categories(),
        store.list_sub_categories(None),
        store.list_sellers(),
    )?;

    let rows = filter.apply(summaries);
    Ok(facets::aggregate(&rows, &categories, &sub_categories, &sellers))
}
