//! Feature model: capability tags attached to entries (many-to-many).

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A capability tag such as "MPE" or "Sidechain".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Feature {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub sequence: Option<i32>,
}

impl Feature {
    /// List all features ordered by sequence, then name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let features = sqlx::query_as::<_, Self>(
            "SELECT id, name, slug, description, sequence FROM feature \
             ORDER BY sequence ASC NULLS LAST, name ASC",
        )
        .fetch_all(pool)
        .await
        .context("failed to list features")?;

        Ok(features)
    }

    /// List the features associated with one entry.
    pub async fn list_for_entry(pool: &PgPool, entry_id: i64) -> Result<Vec<Self>> {
        let features = sqlx::query_as::<_, Self>(
            r#"
            SELECT f.id, f.name, f.slug, f.description, f.sequence
            FROM feature f
            INNER JOIN entry_feature ef ON ef.feature_id = f.id
            WHERE ef.entry_id = $1
            ORDER BY f.sequence ASC NULLS LAST, f.name ASC
            "#,
        )
        .bind(entry_id)
        .fetch_all(pool)
        .await
        .context("failed to list entry features")?;

        Ok(features)
    }
}
