//! Category model: groups entries and controls their display order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A category of catalog entries (e.g. "Synthesizer", "Effect").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,

    /// Human-readable name.
    pub name: String,

    /// URL slug, unique.
    pub slug: String,

    /// Display/sort position. Categories without one sort last.
    pub sequence: Option<i32>,

    pub notes: Option<String>,
}

/// A category together with the number of entries filed under it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CategoryCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub category: Category,

    pub entry_count: i64,
}

impl Category {
    /// Find a category by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let category = sqlx::query_as::<_, Self>(
            "SELECT id, name, slug, sequence, notes FROM category WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch category")?;

        Ok(category)
    }

    /// List all categories ordered by sequence, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let categories = sqlx::query_as::<_, Self>(
            "SELECT id, name, slug, sequence, notes FROM category \
             ORDER BY sequence ASC NULLS LAST, name ASC",
        )
        .fetch_all(pool)
        .await
        .context("failed to list categories")?;

        Ok(categories)
    }

    /// List categories with the number of entries in each.
    ///
    /// Counts every entry, active or not.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<CategoryCount>> {
        let counts = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT c.id, c.name, c.slug, c.sequence, c.notes,
                   COUNT(e.id) AS entry_count
            FROM category c
            LEFT JOIN entry e ON e.category_id = c.id
            GROUP BY c.id, c.name, c.slug, c.sequence, c.notes
            ORDER BY c.sequence ASC NULLS LAST, c.name ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .context("failed to count entries per category")?;

        Ok(counts)
    }
}

/// Order categories the way listings and navigation show them.
pub fn display_order(a: &Category, b: &Category) -> std::cmp::Ordering {
    crate::search::filter::nulls_last(a.sequence, b.sequence).then_with(|| a.name.cmp(&b.name))
}
