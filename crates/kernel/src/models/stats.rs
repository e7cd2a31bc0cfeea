//! Catalog statistics.

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::PgPool;

use super::category::{Category, CategoryCount};
use super::developer::Developer;

/// Summary numbers shown on the statistics page.
///
/// Counts cover every entry, including inactive ones.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub categories: Vec<CategoryCount>,
    pub developer_count: i64,
    pub entry_count: i64,
    pub free_count: i64,
}

impl CatalogStats {
    pub async fn load(pool: &PgPool) -> Result<Self> {
        let categories = Category::list_with_counts(pool).await?;
        let developer_count = Developer::count(pool).await?;

        let (entry_count, free_count): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE free) FROM entry",
        )
        .fetch_one(pool)
        .await
        .context("failed to count entries")?;

        Ok(Self {
            categories,
            developer_count,
            entry_count,
            free_count,
        })
    }
}
