//! Developer model.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A software developer (company or individual).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Developer {
    pub id: i64,

    pub name: String,

    /// URL slug, unique.
    pub slug: String,

    /// Developer homepage.
    pub url: String,

    pub notes: Option<String>,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub updated: i64,
}

impl Developer {
    /// Find a developer by slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>> {
        let developer = sqlx::query_as::<_, Self>(
            "SELECT id, name, slug, url, notes, created, updated FROM developer WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await
        .context("failed to fetch developer")?;

        Ok(developer)
    }

    /// List all developers ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let developers = sqlx::query_as::<_, Self>(
            "SELECT id, name, slug, url, notes, created, updated FROM developer \
             ORDER BY LOWER(name), id",
        )
        .fetch_all(pool)
        .await
        .context("failed to list developers")?;

        Ok(developers)
    }

    /// Distinct developer names in case-insensitive order, for autocomplete.
    pub async fn distinct_names(pool: &PgPool) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT name FROM (SELECT DISTINCT name FROM developer) d ORDER BY LOWER(name), name",
        )
        .fetch_all(pool)
        .await
        .context("failed to list developer names")?;

        Ok(names)
    }

    /// Count all developers.
    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM developer")
            .fetch_one(pool)
            .await
            .context("failed to count developers")?;

        Ok(count)
    }
}
