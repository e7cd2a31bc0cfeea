//! In-memory search evaluation and the orderings shared with the SQL side.

use std::cmp::Ordering;

use crate::models::Entry;

use super::{SearchCriteria, SearchOutcome};

/// Evaluate `criteria` against an entry collection.
///
/// Narrows the candidate set one criterion at a time. Features are applied
/// as one containment pass per selected feature, so selecting {F1, F2}
/// keeps only entries that carry both.
pub fn filter_entries<'a, I>(criteria: &SearchCriteria, entries: I) -> SearchOutcome
where
    I: IntoIterator<Item = &'a Entry>,
{
    if criteria.is_empty() {
        return SearchOutcome::NotSearched;
    }

    let mut candidates: Vec<&Entry> = entries.into_iter().filter(|e| e.active).collect();

    if let Some(ref developer) = criteria.developer {
        let needle = developer.to_lowercase();
        candidates.retain(|e| contains_ci(e.developer_name.as_deref(), &needle));
    }
    if let Some(category) = criteria.category {
        candidates.retain(|e| e.category_id == Some(category));
    }
    if let Some(ref title) = criteria.title {
        let needle = title.to_lowercase();
        candidates.retain(|e| contains_ci(Some(&e.name), &needle));
    }
    if criteria.free {
        candidates.retain(|e| e.free);
    }
    if criteria.mac {
        candidates.retain(|e| e.mac);
    }
    if criteria.windows {
        candidates.retain(|e| e.windows);
    }
    if criteria.linux {
        candidates.retain(|e| e.linux);
    }
    for &feature_id in &criteria.features {
        candidates.retain(|e| e.has_feature(feature_id));
    }

    let mut rows: Vec<Entry> = candidates.into_iter().cloned().collect();
    rows.sort_by(search_order);

    SearchOutcome::from_rows(rows)
}

fn contains_ci(haystack: Option<&str>, lowered_needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(lowered_needle))
}

/// `None` sorts after every `Some`.
pub fn nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn lower(value: Option<&str>) -> Option<String> {
    value.map(str::to_lowercase)
}

/// Search results: developer name (case-insensitive), category sequence,
/// entry name (case-insensitive), id.
pub fn search_order(a: &Entry, b: &Entry) -> Ordering {
    nulls_last(
        lower(a.developer_name.as_deref()),
        lower(b.developer_name.as_deref()),
    )
    .then_with(|| nulls_last(a.category_sequence, b.category_sequence))
    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    .then_with(|| a.id.cmp(&b.id))
}

/// Category and full listings: developer name, entry name (both
/// case-insensitive), id.
pub fn listing_order(a: &Entry, b: &Entry) -> Ordering {
    nulls_last(
        lower(a.developer_name.as_deref()),
        lower(b.developer_name.as_deref()),
    )
    .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    .then_with(|| a.id.cmp(&b.id))
}

/// A developer's own page: category sequence, entry name (case-insensitive), id.
pub fn developer_order(a: &Entry, b: &Entry) -> Ordering {
    nulls_last(a.category_sequence, b.category_sequence)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.id.cmp(&b.id))
}

/// Recent updates: newest first, id descending on ties.
pub fn recent_order(a: &Entry, b: &Entry) -> Ordering {
    b.created.cmp(&a.created).then_with(|| b.id.cmp(&a.id))
}
