#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Recent-updates feed served at `/feed/`.

mod common;

use axum::http::{StatusCode, header};

use clapdb_kernel::SiteSettings;
use clapdb_kernel::feed::FEED_TITLE;

use common::{SITE_URL, TestApp, body_string, catalog, site};

/// Entry ids linked from feed items, in document order.
fn item_ids(xml: &str) -> Vec<i64> {
    let prefix = format!("<link>{SITE_URL}/software/");
    xml.split(prefix.as_str())
        .skip(1)
        .filter_map(|rest| rest.split('<').next())
        .filter_map(|id| id.parse().ok())
        .collect()
}

#[tokio::test]
async fn feed_is_rss() {
    let app = TestApp::new();
    let response = app.get("/feed/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("application/rss+xml"));

    let xml = body_string(response).await;
    assert!(xml.contains("<rss version=\"2.0\""));
    assert!(xml.contains(&format!("<title>{FEED_TITLE}</title>")));
    assert!(xml.contains(&format!("<link>{SITE_URL}/</link>")));
    assert!(xml.contains(&format!("href=\"{SITE_URL}/feed/\"")));
}

#[tokio::test]
async fn feed_lists_active_entries_newest_first() {
    let app = TestApp::new();
    let xml = body_string(app.get("/feed/").await).await;

    // 4 is outside the window, 5 is inactive
    assert_eq!(item_ids(&xml), vec![1, 2, 3, 6]);
    assert!(!xml.contains("Retired"));
    assert!(!xml.contains("SuperSynth"));
}

#[tokio::test]
async fn feed_items_carry_date_developer_and_name() {
    let app = TestApp::new();
    let xml = body_string(app.get("/feed/").await).await;

    assert!(xml.contains("— Beta Audio Alpha</title>"));
    assert!(xml.contains("— alpha labs Charlie</title>"));
    assert!(xml.contains(&format!("<guid isPermaLink=\"true\">{SITE_URL}/software/1</guid>")));
    assert!(xml.contains("<pubDate>"));
    assert!(xml.contains("&lt;p&gt;Developer: Beta Audio&lt;/p&gt;"));
}

#[tokio::test]
async fn feed_respects_cap() {
    let app = TestApp::with(
        catalog(),
        SiteSettings {
            recent_updates_max: 2,
            ..site()
        },
    );
    let xml = body_string(app.get("/feed/").await).await;

    assert_eq!(item_ids(&xml), vec![1, 2]);
}

#[tokio::test]
async fn feed_respects_window() {
    let app = TestApp::with(
        catalog(),
        SiteSettings {
            recent_updates_days: 5,
            ..site()
        },
    );
    let xml = body_string(app.get("/feed/").await).await;

    assert_eq!(item_ids(&xml), vec![1, 2, 3]);
}

#[tokio::test]
async fn empty_window_gives_empty_channel() {
    let app = TestApp::with(
        catalog(),
        SiteSettings {
            recent_updates_days: 0,
            ..site()
        },
    );
    let response = app.get("/feed/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let xml = body_string(response).await;
    assert!(xml.contains("<channel>"));
    assert!(!xml.contains("<item>"));
}
