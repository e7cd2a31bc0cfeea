//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::{Config, SiteSettings};
use crate::db;
use crate::feed::RecentWindow;
use crate::models::Entry;
use crate::store::{CatalogStore, PgCatalogStore};
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Catalog read access.
    store: Arc<dyn CatalogStore>,

    /// Template engine.
    theme: Arc<ThemeEngine>,

    /// Site name, URL, and recent-updates window.
    site: SiteSettings,
}

impl AppState {
    /// Connect to PostgreSQL, apply migrations, and load templates.
    pub async fn new(config: &Config) -> Result<Self> {
        let pool = db::create_pool(config)
            .await
            .context("failed to create database pool")?;

        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;

        let theme =
            ThemeEngine::new(&config.templates_dir).context("failed to load templates")?;

        info!(
            templates_dir = %config.templates_dir.display(),
            "catalog store and templates ready"
        );

        Ok(Self::from_parts(
            Arc::new(PgCatalogStore::new(pool)),
            theme,
            config.site(),
        ))
    }

    /// Assemble state from already-built parts.
    pub fn from_parts(store: Arc<dyn CatalogStore>, theme: ThemeEngine, site: SiteSettings) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                theme: Arc::new(theme),
                site,
            }),
        }
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.inner.store.as_ref()
    }

    pub fn theme(&self) -> &Arc<ThemeEngine> {
        &self.inner.theme
    }

    pub fn site(&self) -> &SiteSettings {
        &self.inner.site
    }

    pub fn recent_window(&self) -> RecentWindow {
        RecentWindow::new(
            self.inner.site.recent_updates_days,
            self.inner.site.recent_updates_max,
        )
    }

    /// Active entries inside the recent-updates window, newest first.
    pub async fn recent_updates(&self) -> Result<Vec<Entry>> {
        let window = self.recent_window();
        let since = window.since(chrono::Utc::now().timestamp());
        self.store().recent_entries(since, window.max).await
    }
}
