//! In-memory catalog store.
//!
//! Holds a full copy of the catalog and answers every query with the same
//! filters and orderings as the SQL side (see [`crate::search::filter`]).

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::CatalogStore;
use crate::models::category::display_order;
use crate::models::{CatalogStats, Category, CategoryCount, Developer, Entry, Feature, Snippet};
use crate::search::filter::{
    developer_order, filter_entries, listing_order, nulls_last, recent_order,
};
use crate::search::{SearchCriteria, SearchOutcome};

/// A complete catalog snapshot.
///
/// Entries only need their own columns plus `developer_id`, `category_id`
/// and `feature_ids`; the joined developer/category columns are filled in
/// by the store.
#[derive(Debug, Clone, Default)]
pub struct CatalogData {
    pub developers: Vec<Developer>,
    pub categories: Vec<Category>,
    pub features: Vec<Feature>,
    pub entries: Vec<Entry>,
    pub snippets: Vec<Snippet>,
}

impl CatalogData {
    /// Copy developer and category columns onto each entry.
    fn resolve_joins(&mut self) {
        for entry in &mut self.entries {
            let developer = entry
                .developer_id
                .and_then(|id| self.developers.iter().find(|d| d.id == id));
            entry.developer_name = developer.map(|d| d.name.clone());
            entry.developer_slug = developer.map(|d| d.slug.clone());

            let category = entry
                .category_id
                .and_then(|id| self.categories.iter().find(|c| c.id == id));
            entry.category_name = category.map(|c| c.name.clone());
            entry.category_slug = category.map(|c| c.slug.clone());
            entry.category_sequence = category.and_then(|c| c.sequence);

            entry.feature_ids.sort_unstable();
            entry.feature_ids.dedup();
        }
    }
}

/// Catalog store backed by a [`CatalogData`] snapshot.
#[derive(Default)]
pub struct MemoryCatalogStore {
    data: RwLock<CatalogData>,
}

impl MemoryCatalogStore {
    pub fn new(mut data: CatalogData) -> Self {
        data.resolve_joins();
        Self {
            data: RwLock::new(data),
        }
    }

    /// Swap in a new snapshot.
    pub fn replace(&self, mut data: CatalogData) {
        data.resolve_joins();
        *self.data.write() = data;
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn entry(&self, id: i64) -> Result<Option<Entry>> {
        Ok(self.data.read().entries.iter().find(|e| e.id == id).cloned())
    }

    async fn entry_features(&self, entry_id: i64) -> Result<Vec<Feature>> {
        let data = self.data.read();
        let Some(entry) = data.entries.iter().find(|e| e.id == entry_id) else {
            return Ok(Vec::new());
        };

        let mut features: Vec<Feature> = data
            .features
            .iter()
            .filter(|f| entry.has_feature(f.id))
            .cloned()
            .collect();
        features.sort_by(|a, b| nulls_last(a.sequence, b.sequence).then_with(|| a.name.cmp(&b.name)));
        Ok(features)
    }

    async fn active_entries(&self, category_id: Option<i64>) -> Result<Vec<Entry>> {
        let data = self.data.read();
        let mut entries: Vec<Entry> = data
            .entries
            .iter()
            .filter(|e| e.active)
            .filter(|e| category_id.is_none() || e.category_id == category_id)
            .cloned()
            .collect();
        entries.sort_by(listing_order);
        Ok(entries)
    }

    async fn recent_entries(&self, since: i64, limit: u32) -> Result<Vec<Entry>> {
        let data = self.data.read();
        let mut entries: Vec<Entry> = data
            .entries
            .iter()
            .filter(|e| e.active && e.created >= since)
            .cloned()
            .collect();
        entries.sort_by(recent_order);
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome> {
        Ok(filter_entries(criteria, &self.data.read().entries))
    }

    async fn developer_by_slug(&self, slug: &str) -> Result<Option<Developer>> {
        Ok(self
            .data
            .read()
            .developers
            .iter()
            .find(|d| d.slug == slug)
            .cloned())
    }

    async fn developers(&self) -> Result<Vec<Developer>> {
        let mut developers = self.data.read().developers.clone();
        developers.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(developers)
    }

    async fn developer_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .data
            .read()
            .developers
            .iter()
            .map(|d| d.name.clone())
            .collect();
        names.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));
        names.dedup();
        Ok(names)
    }

    async fn developer_entries(&self, developer_id: i64) -> Result<Vec<Entry>> {
        let data = self.data.read();
        let mut entries: Vec<Entry> = data
            .entries
            .iter()
            .filter(|e| e.active && e.developer_id == Some(developer_id))
            .cloned()
            .collect();
        entries.sort_by(developer_order);
        Ok(entries)
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .data
            .read()
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.data.read().categories.clone();
        categories.sort_by(display_order);
        Ok(categories)
    }

    async fn features(&self) -> Result<Vec<Feature>> {
        let mut features = self.data.read().features.clone();
        features.sort_by(|a, b| nulls_last(a.sequence, b.sequence).then_with(|| a.name.cmp(&b.name)));
        Ok(features)
    }

    async fn snippets(&self) -> Result<Vec<Snippet>> {
        let mut snippets = self.data.read().snippets.clone();
        snippets.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(snippets)
    }

    async fn stats(&self) -> Result<CatalogStats> {
        let data = self.data.read();

        let mut categories: Vec<Category> = data.categories.clone();
        categories.sort_by(display_order);

        let categories = categories
            .into_iter()
            .map(|category| CategoryCount {
                entry_count: data
                    .entries
                    .iter()
                    .filter(|e| e.category_id == Some(category.id))
                    .count() as i64,
                category,
            })
            .collect();

        Ok(CatalogStats {
            categories,
            developer_count: data.developers.len() as i64,
            entry_count: data.entries.len() as i64,
            free_count: data.entries.iter().filter(|e| e.free).count() as i64,
        })
    }

    async fn healthy(&self) -> bool {
        true
    }
}
