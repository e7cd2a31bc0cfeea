//! Small rendering helpers shared by templates, handlers, and the feed.

use std::collections::HashMap;

use chrono::DateTime;

use crate::models::Entry;

/// HTML-escape a string for safe output.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Platform list of an entry joined for display, e.g. `Mac, Windows`.
pub fn osses_label(entry: &Entry) -> String {
    entry.osses().join(", ")
}

/// Tera filter: Unix timestamp to `YYYY-MM-DD`.
pub(super) fn format_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let timestamp = match value {
        tera::Value::Number(n) => n.as_i64().unwrap_or(0),
        _ => return Ok(tera::Value::String(String::new())),
    };

    let formatted = DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    Ok(tera::Value::String(formatted))
}

/// Tera filter: serialized [`Entry`] to its platform list.
pub(super) fn osses_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let entry: Entry = serde_json::from_value(value.clone())
        .map_err(|e| tera::Error::msg(format!("osses filter expects an entry: {e}")))?;

    Ok(tera::Value::String(osses_label(&entry)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn entry(mac: bool, windows: bool, linux: bool) -> Entry {
        Entry {
            id: 1,
            name: "Synth".to_string(),
            version: None,
            url: None,
            notes: None,
            free: false,
            mac,
            windows,
            linux,
            active: true,
            created: 0,
            updated: 0,
            category_id: None,
            developer_id: None,
            developer_name: None,
            developer_slug: None,
            category_name: None,
            category_slug: None,
            category_sequence: None,
            feature_ids: Vec::new(),
        }
    }

    #[test]
    fn html_escape_special_chars() {
        assert_eq!(
            html_escape("<script>alert('xss')</script>"),
            "&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape(r#"say "hello""#), "say &quot;hello&quot;");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn osses_keep_display_order() {
        assert_eq!(osses_label(&entry(true, true, true)), "Mac, Windows, Linux");
        assert_eq!(osses_label(&entry(false, true, true)), "Windows, Linux");
        assert_eq!(osses_label(&entry(false, false, false)), "");
    }

    #[test]
    fn format_date_renders_day() {
        let value = tera::Value::from(1_792_411_200_i64);
        let out = format_date_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("2026-10-19".to_string()));
    }

    #[test]
    fn format_date_ignores_non_numbers() {
        let out = format_date_filter(&tera::Value::Null, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String(String::new()));
    }

    #[test]
    fn osses_filter_reads_serialized_entry() {
        let value = serde_json::to_value(entry(true, false, true)).unwrap();
        let out = osses_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("Mac, Linux".to_string()));
    }
}
