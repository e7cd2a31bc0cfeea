//! PostgreSQL-backed catalog store.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use super::CatalogStore;
use crate::db;
use crate::models::{CatalogStats, Category, Developer, Entry, Feature, Snippet};
use crate::search::{SearchCriteria, SearchOutcome};

/// Catalog store reading straight from the database.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn entry(&self, id: i64) -> Result<Option<Entry>> {
        Entry::find_by_id(&self.pool, id).await
    }

    async fn entry_features(&self, entry_id: i64) -> Result<Vec<Feature>> {
        Feature::list_for_entry(&self.pool, entry_id).await
    }

    async fn active_entries(&self, category_id: Option<i64>) -> Result<Vec<Entry>> {
        Entry::list_active(&self.pool, category_id).await
    }

    async fn recent_entries(&self, since: i64, limit: u32) -> Result<Vec<Entry>> {
        Entry::list_recent(&self.pool, since, limit).await
    }

    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome> {
        if criteria.is_empty() {
            return Ok(SearchOutcome::NotSearched);
        }

        let rows = Entry::search(&self.pool, criteria).await?;
        Ok(SearchOutcome::from_rows(rows))
    }

    async fn developer_by_slug(&self, slug: &str) -> Result<Option<Developer>> {
        Developer::find_by_slug(&self.pool, slug).await
    }

    async fn developers(&self) -> Result<Vec<Developer>> {
        Developer::list(&self.pool).await
    }

    async fn developer_names(&self) -> Result<Vec<String>> {
        Developer::distinct_names(&self.pool).await
    }

    async fn developer_entries(&self, developer_id: i64) -> Result<Vec<Entry>> {
        Entry::list_for_developer(&self.pool, developer_id).await
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Category::find_by_slug(&self.pool, slug).await
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Category::list(&self.pool).await
    }

    async fn features(&self) -> Result<Vec<Feature>> {
        Feature::list(&self.pool).await
    }

    async fn snippets(&self) -> Result<Vec<Snippet>> {
        Snippet::list(&self.pool).await
    }

    async fn stats(&self) -> Result<CatalogStats> {
        CatalogStats::load(&self.pool).await
    }

    async fn healthy(&self) -> bool {
        db::check_health(&self.pool).await
    }
}
