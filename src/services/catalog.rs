use futures::try_join;
use uuid::Uuid;

use crate::models::{Category, CourseSummary, SubCategory};
use crate::store::{CatalogStore, StoreResult};
use crate::views::{CategoryView, SubCategoryView};

/// One consistent read of the taxonomy plus the published course rows, so
/// category views and per-category counts come out of a single load
/// instead of one query per nested serializer call.
pub struct CatalogSnapshot {
    pub categories: Vec<Category>,
    pub sub_categories: Vec<SubCategory>,
    pub summaries: Vec<CourseSummary>,
}

impl CatalogSnapshot {
    pub async fn load(store: &dyn CatalogStore) -> StoreResult<Self> {
        let (categories, sub_categories, summaries) = try_join!(
            store.list_categories(),
            store.list_sub_categories(None),
            store.published_course_summaries(),
        )?;
        Ok(Self { categories, sub_categories, summaries })
    }

    pub fn available_course_count(&self, category: &Uuid) -> u64 {
        self.summaries.iter().filter(|s| s.category_id == Some(*category)).count() as u64
    }

    pub fn category_view(&self, id: &Uuid) -> Option<CategoryView> {
        let category = self.categories.iter().find(|c| c.id == *id)?.clone();
        Some(self.view_of(category))
    }

    pub fn sub_category_view(&self, id: &Uuid) -> Option<SubCategoryView> {
        let sub_category = self.sub_categories.iter().find(|sc| sc.id == *id)?.clone();
        Some(SubCategoryView { sub_category })
    }

    fn view_of(&self, category: Category) -> CategoryView {
        let sub_categories = self
            .sub_categories
            .iter()
            .filter(|sc| sc.category_id == category.id)
            .cloned()
            .map(|sub_category| SubCategoryView { sub_category })
            .collect();
        let available_course_count = self.available_course_count(&category.id);
        CategoryView { category, sub_categories, available_course_count }
    }
}

/// Category list for the catalog endpoint, name ascending.
pub async fn category_list(store: &dyn CatalogStore) -> StoreResult<Vec<CategoryView>> {
    let snapshot = CatalogSnapshot::load(store).await?;
    let views = snapshot.categories.clone().into_iter().map(|c| snapshot.view_of(c)).collect();
    Ok(views)
}

/// Sub-category list, optionally scoped to one category.
pub async fn sub_category_list(
    store: &dyn CatalogStore,
    category: Option<&Uuid>,
) -> StoreResult<Vec<SubCategoryView>> {
    let subs = store.list_sub_categories(category).await?;
    Ok(subs.into_iter().map(|sub_category| SubCategoryView { sub_category }).collect())
}
