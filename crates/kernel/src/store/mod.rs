//! Catalog storage abstraction.
//!
//! Handlers read the catalog only through [`CatalogStore`], so the same
//! routes run against PostgreSQL in production and against an in-memory
//! catalog in tests.
//!
//! # Usage
//!
//! ```ignore
//! let store: Arc<dyn CatalogStore> = Arc::new(PgCatalogStore::new(pool));
//! let outcome = store.search(&criteria).await?;
//! ```

mod memory;
mod postgres;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::{CatalogData, MemoryCatalogStore};
pub use postgres::PgCatalogStore;

use crate::models::{CatalogStats, Category, Developer, Entry, Feature, Snippet};
use crate::search::{SearchCriteria, SearchOutcome};

/// Read-only access to the catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// One entry by id, active or not.
    async fn entry(&self, id: i64) -> Result<Option<Entry>>;

    /// Features of one entry, ordered by sequence then name.
    async fn entry_features(&self, entry_id: i64) -> Result<Vec<Feature>>;

    /// Active entries, optionally limited to one category, ordered by
    /// developer name then entry name.
    async fn active_entries(&self, category_id: Option<i64>) -> Result<Vec<Entry>>;

    /// Active entries created at or after `since` (Unix seconds), newest
    /// first, at most `limit` of them.
    async fn recent_entries(&self, since: i64, limit: u32) -> Result<Vec<Entry>>;

    /// Answer a search. Empty criteria yield [`SearchOutcome::NotSearched`].
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchOutcome>;

    async fn developer_by_slug(&self, slug: &str) -> Result<Option<Developer>>;

    /// All developers ordered by name.
    async fn developers(&self) -> Result<Vec<Developer>>;

    /// Distinct developer names in case-insensitive order.
    async fn developer_names(&self) -> Result<Vec<String>>;

    /// Active entries of one developer ordered by category then name.
    async fn developer_entries(&self, developer_id: i64) -> Result<Vec<Entry>>;

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// All categories ordered by sequence then name.
    async fn categories(&self) -> Result<Vec<Category>>;

    /// All features ordered by sequence then name.
    async fn features(&self) -> Result<Vec<Feature>>;

    async fn snippets(&self) -> Result<Vec<Snippet>>;

    async fn stats(&self) -> Result<CatalogStats>;

    /// Whether the backing store is reachable.
    async fn healthy(&self) -> bool;
}
