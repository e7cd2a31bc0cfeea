//! Entry model: one cataloged software product.
//!
//! Rows are always loaded joined with their developer and category so that
//! listings, search ordering, and the feed can work from a single struct.
//! The SQL for every entry query is composed in [`crate::search::query_builder`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::search::SearchCriteria;
use crate::search::query_builder::EntryQuery;

/// A cataloged software product, with its developer and category joined in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Entry {
    pub id: i64,

    /// Product name.
    pub name: String,

    pub version: Option<String>,

    /// Product homepage.
    pub url: Option<String>,

    pub notes: Option<String>,

    /// Free of charge.
    pub free: bool,

    pub mac: bool,
    pub windows: bool,
    pub linux: bool,

    /// Soft-delete flag; inactive entries never appear in public listings.
    pub active: bool,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub updated: i64,

    pub category_id: Option<i64>,
    pub developer_id: Option<i64>,

    /// Joined from `developer.name`.
    pub developer_name: Option<String>,
    /// Joined from `developer.slug`.
    pub developer_slug: Option<String>,

    /// Joined from `category.name`.
    pub category_name: Option<String>,
    /// Joined from `category.slug`.
    pub category_slug: Option<String>,
    /// Joined from `category.sequence`.
    pub category_sequence: Option<i32>,

    /// Ids of the associated features, ascending.
    pub feature_ids: Vec<i64>,
}

impl Entry {
    /// Public path of the entry detail page.
    pub fn path(&self) -> String {
        format!("/software/{}", self.id)
    }

    /// Whether the entry is associated with `feature_id`.
    pub fn has_feature(&self, feature_id: i64) -> bool {
        self.feature_ids.contains(&feature_id)
    }

    /// Platforms the entry runs on, in display order.
    pub fn osses(&self) -> Vec<&'static str> {
        let mut osses = Vec::with_capacity(3);
        if self.mac {
            osses.push("Mac");
        }
        if self.windows {
            osses.push("Windows");
        }
        if self.linux {
            osses.push("Linux");
        }
        osses
    }

    /// Find an entry by id, active or not.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let sql = EntryQuery::by_id(id).build();
        let entry = sqlx::query_as::<_, Self>(&sql)
            .fetch_optional(pool)
            .await
            .context("failed to fetch entry")?;

        Ok(entry)
    }

    /// Active entries, optionally limited to one category, in listing order.
    pub async fn list_active(pool: &PgPool, category_id: Option<i64>) -> Result<Vec<Self>> {
        let sql = EntryQuery::active_listing(category_id).build();
        let entries = sqlx::query_as::<_, Self>(&sql)
            .fetch_all(pool)
            .await
            .context("failed to list active entries")?;

        Ok(entries)
    }

    /// Active entries created at or after `since`, newest first, at most `limit`.
    pub async fn list_recent(pool: &PgPool, since: i64, limit: u32) -> Result<Vec<Self>> {
        let sql = EntryQuery::recent(since, limit).build();
        let entries = sqlx::query_as::<_, Self>(&sql)
            .fetch_all(pool)
            .await
            .context("failed to list recent entries")?;

        Ok(entries)
    }

    /// Active entries of one developer, ordered by category then name.
    pub async fn list_for_developer(pool: &PgPool, developer_id: i64) -> Result<Vec<Self>> {
        let sql = EntryQuery::for_developer(developer_id).build();
        let entries = sqlx::query_as::<_, Self>(&sql)
            .fetch_all(pool)
            .await
            .context("failed to list developer entries")?;

        Ok(entries)
    }

    /// Rows matching `criteria` in search order.
    ///
    /// Returns an empty list when `criteria` is empty; callers decide whether
    /// that means "not searched" or "no matches".
    pub async fn search(pool: &PgPool, criteria: &SearchCriteria) -> Result<Vec<Self>> {
        // Rendered before awaiting: the statement itself is not Send
        let Some(sql) = EntryQuery::search(criteria).map(|query| query.build()) else {
            return Ok(Vec::new());
        };

        let entries = sqlx::query_as::<_, Self>(&sql)
            .fetch_all(pool)
            .await
            .context("failed to run entry search")?;

        Ok(entries)
    }
}
