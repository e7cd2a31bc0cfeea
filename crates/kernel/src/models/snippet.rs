//! Snippets: HTML fragments stored by slug and injected into templates.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Snippet {
    pub id: i64,
    pub slug: String,
    /// Trusted HTML, rendered without escaping.
    pub html: String,
}

impl Snippet {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let snippets = sqlx::query_as::<_, Self>("SELECT id, slug, html FROM snippet ORDER BY slug")
            .fetch_all(pool)
            .await
            .context("failed to list snippets")?;

        Ok(snippets)
    }
}

/// Snippet HTML keyed by slug.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SnippetSet(BTreeMap<String, String>);

impl SnippetSet {
    /// HTML for `slug`, or an empty string when no such snippet exists.
    pub fn get(&self, slug: &str) -> &str {
        self.0.get(slug).map(String::as_str).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Snippet> for SnippetSet {
    fn from_iter<I: IntoIterator<Item = Snippet>>(iter: I) -> Self {
        Self(iter.into_iter().map(|s| (s.slug, s.html)).collect())
    }
}
