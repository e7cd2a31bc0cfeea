#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Every test runs the real kernel routes and search code against an
//! in-memory catalog, so no database is needed.
//!
//! The shared catalog ([`catalog`]):
//!
//! | id | name           | developer  | category    | features | notes            |
//! |----|----------------|------------|-------------|----------|------------------|
//! | 1  | Alpha          | Beta Audio | Synthesizer | 1        | created -1 day   |
//! | 2  | Bravo          | Beta Audio | Synthesizer | 1, 2     | created -2 days  |
//! | 3  | Charlie        | alpha labs | Effect      | 1, 2, 3  | created -3 days  |
//! | 4  | SuperSynth Pro | Gamma      | Synthesizer | -        | free, -40 days   |
//! | 5  | Retired        | alpha labs | Synthesizer | 1, 2     | inactive, -1 h   |
//! | 6  | Aardvark       | Beta Audio | Effect      | -        | created -10 days |

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use tower::ServiceExt;

use clapdb_kernel::models::{Category, Developer, Entry, Feature, Snippet};
use clapdb_kernel::store::{CatalogData, MemoryCatalogStore};
use clapdb_kernel::theme::ThemeEngine;
use clapdb_kernel::{AppState, SiteSettings, db, routes};

pub const DAY: i64 = 86_400;
pub const SITE_URL: &str = "https://clapdb.test";
pub const INTRO_HTML: &str = "<p>Welcome to the catalog</p>";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn category(id: i64, name: &str, slug: &str, sequence: Option<i32>) -> Category {
    Category {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        sequence,
        notes: None,
    }
}

pub fn developer(id: i64, name: &str, slug: &str) -> Developer {
    Developer {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        url: format!("https://{slug}.example"),
        notes: None,
        created: 0,
        updated: 0,
    }
}

pub fn feature(id: i64, name: &str) -> Feature {
    Feature {
        id,
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "-"),
        description: None,
        sequence: Some(id as i32),
    }
}

/// An active Mac/Windows entry; joined columns are filled in by the store.
pub fn entry(id: i64, name: &str, developer_id: i64, category_id: i64, features: &[i64]) -> Entry {
    Entry {
        id,
        name: name.to_string(),
        version: Some("1.0".to_string()),
        url: Some(format!("https://example.com/{id}")),
        notes: None,
        free: false,
        mac: true,
        windows: true,
        linux: false,
        active: true,
        created: 0,
        updated: 0,
        category_id: Some(category_id),
        developer_id: Some(developer_id),
        developer_name: None,
        developer_slug: None,
        category_name: None,
        category_slug: None,
        category_sequence: None,
        feature_ids: features.to_vec(),
    }
}

fn created(entry: Entry, created: i64) -> Entry {
    Entry {
        created,
        updated: created + 60,
        ..entry
    }
}

/// The shared catalog described in the module docs.
pub fn catalog() -> CatalogData {
    let now = now();

    CatalogData {
        developers: vec![
            developer(1, "Beta Audio", "beta-audio"),
            developer(2, "alpha labs", "alpha-labs"),
            developer(3, "Gamma", "gamma"),
        ],
        categories: vec![
            category(1, "Synthesizer", "synth", Some(1)),
            category(2, "Effect", "effect", Some(2)),
            category(3, "Utility", "utility", None),
        ],
        features: vec![
            feature(1, "MPE"),
            feature(2, "Sidechain"),
            feature(3, "Polyphonic modulation"),
        ],
        entries: vec![
            created(entry(1, "Alpha", 1, 1, &[1]), now - DAY),
            created(entry(2, "Bravo", 1, 1, &[1, 2]), now - 2 * DAY),
            created(entry(3, "Charlie", 2, 2, &[1, 2, 3]), now - 3 * DAY),
            Entry {
                free: true,
                linux: true,
                ..created(entry(4, "SuperSynth Pro", 3, 1, &[]), now - 40 * DAY)
            },
            Entry {
                active: false,
                ..created(entry(5, "Retired", 2, 1, &[1, 2]), now - 3600)
            },
            created(entry(6, "Aardvark", 1, 2, &[]), now - 10 * DAY),
        ],
        snippets: vec![Snippet {
            id: 1,
            slug: "home_intro".to_string(),
            html: INTRO_HTML.to_string(),
        }],
    }
}

/// Three entries A{1}, B{1,2}, C{1,2,3} from one developer in one category.
pub fn containment_catalog() -> CatalogData {
    CatalogData {
        developers: vec![developer(1, "Acme", "acme")],
        categories: vec![category(1, "Synthesizer", "synth", Some(1))],
        features: vec![feature(1, "F1"), feature(2, "F2"), feature(3, "F3")],
        entries: vec![
            entry(1, "A", 1, 1, &[1]),
            entry(2, "B", 1, 1, &[1, 2]),
            entry(3, "C", 1, 1, &[1, 2, 3]),
        ],
        snippets: Vec::new(),
    }
}

pub fn site() -> SiteSettings {
    SiteSettings {
        site_name: "CLAP Test Catalog".to_string(),
        site_url: SITE_URL.to_string(),
        recent_updates_days: 30,
        recent_updates_max: 20,
    }
}

/// Test application wrapper using the real kernel routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub store: Arc<MemoryCatalogStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(catalog(), site())
    }

    pub fn with(data: CatalogData, site: SiteSettings) -> Self {
        let store = Arc::new(MemoryCatalogStore::new(data));
        let theme = ThemeEngine::builtin().expect("built-in templates compile");
        let state = AppState::from_parts(store.clone(), theme, site);

        // Must match main.rs, minus the middleware
        let router = routes::router().with_state(state.clone());

        Self {
            router,
            state,
            store,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

/// Ids of the entries linked from an HTML page, in document order.
pub fn linked_entry_ids(html: &str) -> Vec<i64> {
    html.split("href=\"/software/")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .filter_map(|id| id.parse().ok())
        .collect()
}

/// A migrated catalog in its own scratch PostgreSQL schema.
///
/// Database tests call [`TestDb::connect`] and return early when it yields
/// `None`, i.e. when `DATABASE_URL` is not set.
pub struct TestDb {
    pub pool: PgPool,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    pub async fn connect() -> Option<Self> {
        dotenvy::dotenv().ok();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        };

        static NEXT_SCHEMA: AtomicUsize = AtomicUsize::new(0);
        let schema = format!(
            "clapdb_test_{}_{}",
            std::process::id(),
            NEXT_SCHEMA.fetch_add(1, Ordering::Relaxed)
        );

        let admin = PgPoolOptions::new()
            .max_connections(1)
            .connect(&url)
            .await
            .expect("Failed to connect to DATABASE_URL");
        sqlx::query(&format!("CREATE SCHEMA {schema}"))
            .execute(&admin)
            .await
            .expect("Failed to create test schema");

        let search_path = format!("SET search_path TO {schema}");
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    conn.execute(search_path.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("Failed to connect test pool");

        db::run_migrations(&pool)
            .await
            .expect("Failed to apply migrations");

        Some(Self {
            pool,
            admin,
            schema,
        })
    }

    /// Insert `data` with its ids preserved.
    pub async fn seed(&self, data: &CatalogData) {
        for d in &data.developers {
            sqlx::query(
                "INSERT INTO developer (id, name, slug, url, notes, created, updated) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(d.id)
            .bind(&d.name)
            .bind(&d.slug)
            .bind(&d.url)
            .bind(&d.notes)
            .bind(d.created)
            .bind(d.updated)
            .execute(&self.pool)
            .await
            .unwrap();
        }

        for c in &data.categories {
            sqlx::query(
                "INSERT INTO category (id, name, slug, sequence, notes) VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(c.id)
            .bind(&c.name)
            .bind(&c.slug)
            .bind(c.sequence)
            .bind(&c.notes)
            .execute(&self.pool)
            .await
            .unwrap();
        }

        for f in &data.features {
            sqlx::query(
                "INSERT INTO feature (id, name, slug, description, sequence) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(f.id)
            .bind(&f.name)
            .bind(&f.slug)
            .bind(&f.description)
            .bind(f.sequence)
            .execute(&self.pool)
            .await
            .unwrap();
        }

        for e in &data.entries {
            sqlx::query(
                "INSERT INTO entry (id, name, category_id, developer_id, url, version, notes, \
                 free, mac, windows, linux, active, created, updated) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
            )
            .bind(e.id)
            .bind(&e.name)
            .bind(e.category_id)
            .bind(e.developer_id)
            .bind(&e.url)
            .bind(&e.version)
            .bind(&e.notes)
            .bind(e.free)
            .bind(e.mac)
            .bind(e.windows)
            .bind(e.linux)
            .bind(e.active)
            .bind(e.created)
            .bind(e.updated)
            .execute(&self.pool)
            .await
            .unwrap();

            for feature_id in &e.feature_ids {
                sqlx::query("INSERT INTO entry_feature (entry_id, feature_id) VALUES ($1, $2)")
                    .bind(e.id)
                    .bind(feature_id)
                    .execute(&self.pool)
                    .await
                    .unwrap();
            }
        }

        for s in &data.snippets {
            sqlx::query("INSERT INTO snippet (id, slug, html) VALUES ($1, $2, $3)")
                .bind(s.id)
                .bind(&s.slug)
                .bind(&s.html)
                .execute(&self.pool)
                .await
                .unwrap();
        }
    }

    /// Close the pool and drop the scratch schema.
    pub async fn cleanup(self) {
        self.pool.close().await;
        let _ = sqlx::query(&format!("DROP SCHEMA {} CASCADE", self.schema))
            .execute(&self.admin)
            .await;
        self.admin.close().await;
    }
}
