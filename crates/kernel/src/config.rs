//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Default site name shown in page titles.
pub const DEFAULT_SITE_NAME: &str = "CLAP Audio Software Database";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in pool (default: 10).
    pub database_max_connections: u32,

    /// Path to the Tera templates directory (default: ./templates).
    pub templates_dir: PathBuf,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,

    /// Public site URL for constructing absolute links in the feed.
    pub site_url: String,

    /// Site name used in page titles.
    pub site_name: String,

    /// Trailing window, in days, for the recent-updates list (default: 30).
    pub recent_updates_days: u32,

    /// Maximum number of recent updates shown (default: 20).
    pub recent_updates_max: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let templates_dir = env::var("TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./templates"));

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let site_name = env::var("SITE_NAME").unwrap_or_else(|_| DEFAULT_SITE_NAME.to_string());

        let recent_updates_days = env::var("RECENT_UPDATES_DAYS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("RECENT_UPDATES_DAYS must be a valid u32")?;

        let recent_updates_max = env::var("RECENT_UPDATES_MAX")
            .unwrap_or_else(|_| "20".to_string())
            .parse()
            .context("RECENT_UPDATES_MAX must be a valid u32")?;

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            templates_dir,
            cors_allowed_origins,
            site_url,
            site_name,
            recent_updates_days,
            recent_updates_max,
        })
    }

    /// Site-facing settings derived from this configuration.
    pub fn site(&self) -> SiteSettings {
        SiteSettings {
            site_name: self.site_name.clone(),
            site_url: self.site_url.trim_end_matches('/').to_string(),
            recent_updates_days: self.recent_updates_days,
            recent_updates_max: self.recent_updates_max,
        }
    }
}

/// The subset of configuration that page handlers need.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub site_name: String,
    /// Absolute site URL without a trailing slash.
    pub site_url: String,
    pub recent_updates_days: u32,
    pub recent_updates_max: u32,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            site_url: "http://localhost:3000".to_string(),
            recent_updates_days: 30,
            recent_updates_max: 20,
        }
    }
}
