//! Recent-updates feed.
//!
//! The same window (trailing N days, at most M entries, newest first) backs
//! the home page list and the RSS 2.0 document served at `/feed/`.

use std::io::Cursor;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::models::Entry;
use crate::theme::helpers::html_escape;

/// Channel title and description.
pub const FEED_TITLE: &str = "CLAP Audio Software Database Recent Updates";

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Trailing window for recent updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentWindow {
    pub days: u32,
    pub max: u32,
}

impl RecentWindow {
    pub fn new(days: u32, max: u32) -> Self {
        Self { days, max }
    }

    /// Earliest creation timestamp inside the window ending at `now`.
    pub fn since(&self, now: i64) -> i64 {
        now - i64::from(self.days) * SECONDS_PER_DAY
    }
}

/// Channel-level metadata.
#[derive(Debug, Clone)]
pub struct FeedChannel {
    pub title: String,
    pub description: String,
    /// Absolute site URL without a trailing slash.
    pub site_url: String,
}

impl FeedChannel {
    pub fn recent_updates(site_url: &str) -> Self {
        Self {
            title: FEED_TITLE.to_string(),
            description: FEED_TITLE.to_string(),
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    fn feed_url(&self) -> String {
        format!("{}/feed/", self.site_url)
    }

    fn entry_url(&self, entry: &Entry) -> String {
        format!("{}{}", self.site_url, entry.path())
    }
}

/// `YYYY-MM-DD` for a Unix timestamp, empty when out of range.
pub fn format_day(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Item title, e.g. `2026-10-19 — Acme Rocket Synth`.
pub fn item_title(entry: &Entry) -> String {
    let day = format_day(entry.created);
    match entry.developer_name.as_deref() {
        Some(developer) => format!("{day} — {developer} {}", entry.name),
        None => format!("{day} — {}", entry.name),
    }
}

/// Item description as an HTML fragment.
pub fn item_description(entry: &Entry) -> String {
    let mut html = String::new();

    if let Some(developer) = entry.developer_name.as_deref() {
        html.push_str(&format!("<p>Developer: {}</p>\n", html_escape(developer)));
    }
    html.push_str(&format!("<p>Title: {}</p>\n", html_escape(&entry.name)));
    if let Some(version) = entry.version.as_deref().filter(|v| !v.is_empty()) {
        html.push_str(&format!("<p>Version: {}</p>\n", html_escape(version)));
    }
    if let Some(url) = entry.url.as_deref().filter(|u| !u.is_empty()) {
        let url = html_escape(url);
        html.push_str(&format!("<p>URL: <a href=\"{url}\">{url}</a></p>\n"));
    }
    if let Some(notes) = entry.notes.as_deref().filter(|n| !n.is_empty()) {
        html.push_str("<p>Notes:</p>");
        html.push_str(notes);
        html.push('\n');
    }

    html
}

fn rfc2822(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc2822())
        .unwrap_or_default()
}

fn rfc3339(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

/// Render `entries` (already windowed and ordered) as an RSS 2.0 document.
pub fn render_rss(channel: &FeedChannel, entries: &[Entry]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    writer
        .create_element("title")
        .write_text_content(BytesText::new(&channel.title))?;
    writer
        .create_element("link")
        .write_text_content(BytesText::new(&format!("{}/", channel.site_url)))?;
    writer
        .create_element("description")
        .write_text_content(BytesText::new(&channel.description))?;
    writer
        .create_element("atom:link")
        .with_attribute(("href", channel.feed_url().as_str()))
        .with_attribute(("rel", "self"))
        .write_empty()?;

    if let Some(last_build) = entries.iter().map(|e| e.updated).max() {
        writer
            .create_element("lastBuildDate")
            .write_text_content(BytesText::new(&rfc2822(last_build)))?;
    }

    for entry in entries {
        let link = channel.entry_url(entry);

        writer.write_event(Event::Start(BytesStart::new("item")))?;
        writer
            .create_element("title")
            .write_text_content(BytesText::new(&item_title(entry)))?;
        writer
            .create_element("link")
            .write_text_content(BytesText::new(&link))?;
        writer
            .create_element("description")
            .write_text_content(BytesText::new(&item_description(entry)))?;
        writer
            .create_element("guid")
            .with_attribute(("isPermaLink", "true"))
            .write_text_content(BytesText::new(&link))?;
        writer
            .create_element("pubDate")
            .write_text_content(BytesText::new(&rfc2822(entry.created)))?;
        writer
            .create_element("atom:updated")
            .write_text_content(BytesText::new(&rfc3339(entry.updated)))?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    String::from_utf8(writer.into_inner().into_inner()).context("feed is not valid UTF-8")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    // 2026-10-19T12:00:00Z
    const NOW: i64 = 1_792_411_200;

    fn entry(id: i64, name: &str, created: i64) -> Entry {
        Entry {
            id,
            name: name.to_string(),
            version: Some("1.2".to_string()),
            url: Some("https://example.com/synth".to_string()),
            notes: None,
            free: false,
            mac: true,
            windows: true,
            linux: false,
            active: true,
            created,
            updated: created + 60,
            category_id: None,
            developer_id: Some(1),
            developer_name: Some("Acme".to_string()),
            developer_slug: Some("acme".to_string()),
            category_name: None,
            category_slug: None,
            category_sequence: None,
            feature_ids: Vec::new(),
        }
    }

    #[test]
    fn window_since_subtracts_days() {
        let window = RecentWindow::new(30, 10);
        assert_eq!(window.since(NOW), NOW - 30 * 86_400);
        assert_eq!(RecentWindow::new(0, 10).since(NOW), NOW);
    }

    #[test]
    fn title_carries_date_developer_and_name() {
        let e = entry(1, "Rocket Synth", NOW);
        assert_eq!(item_title(&e), format!("{} — Acme Rocket Synth", format_day(NOW)));

        let orphan = Entry {
            developer_name: None,
            ..entry(2, "Lonely", NOW)
        };
        assert!(item_title(&orphan).ends_with("— Lonely"));
    }

    #[test]
    fn description_includes_notes_only_when_present() {
        let e = entry(1, "Rocket Synth", NOW);
        let html = item_description(&e);
        assert!(html.contains("<p>Developer: Acme</p>"));
        assert!(html.contains("<p>Title: Rocket Synth</p>"));
        assert!(html.contains("<p>Version: 1.2</p>"));
        assert!(html.contains("https://example.com/synth"));
        assert!(!html.contains("Notes:"));

        let noted = Entry {
            notes: Some("<b>Beta</b> build".to_string()),
            ..e
        };
        assert!(item_description(&noted).contains("<p>Notes:</p><b>Beta</b> build"));
    }

    #[test]
    fn description_escapes_entry_fields() {
        let e = entry(1, "Fish & <Chips>", NOW);
        assert!(item_description(&e).contains("Title: Fish &amp; &lt;Chips&gt;"));
    }

    #[test]
    fn rss_lists_items_in_given_order() {
        let newer = entry(2, "Newer", NOW);
        let older = entry(1, "Older", NOW - 86_400);
        let channel = FeedChannel::recent_updates("https://clapdb.example/");

        let xml = render_rss(&channel, &[newer, older]).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\""));
        assert!(xml.contains(&format!("<title>{FEED_TITLE}</title>")));
        assert!(xml.contains("<link>https://clapdb.example/</link>"));
        assert!(xml.contains("<link>https://clapdb.example/software/2</link>"));
        assert_eq!(xml.matches("<item>").count(), 2);

        let newer_at = xml.find("Newer").unwrap();
        let older_at = xml.find("Older").unwrap();
        assert!(newer_at < older_at);
        assert!(xml.contains("<lastBuildDate>"));
        assert!(xml.contains("<atom:updated>"));
    }

    #[test]
    fn rss_escapes_item_html() {
        let xml = render_rss(
            &FeedChannel::recent_updates("http://localhost:3000"),
            &[entry(1, "Synth", NOW)],
        )
        .unwrap();

        assert!(xml.contains("&lt;p&gt;Title: Synth&lt;/p&gt;"));
        assert!(!xml.contains("<p>Title"));
    }

    #[test]
    fn empty_feed_has_channel_but_no_items() {
        let xml = render_rss(&FeedChannel::recent_updates("http://localhost:3000"), &[]).unwrap();
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
        assert!(!xml.contains("<lastBuildDate>"));
    }
}
