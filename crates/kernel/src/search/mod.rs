//! Catalog search.
//!
//! A search starts as raw form input ([`SearchForm`]), is validated into a
//! typed [`SearchCriteria`], and is answered by a
//! [`CatalogStore`](crate::store::CatalogStore) with a [`SearchOutcome`].
//! The handler receives both, bundled in an immutable [`SearchResult`].
//!
//! Every supplied criterion narrows the result (logical AND). Feature
//! criteria in particular are containment filters applied once per selected
//! feature: an entry must carry *every* selected feature, never just one of
//! them. The in-memory evaluation lives in [`filter`], the SQL rendition in
//! [`query_builder`]; both follow the same rules.

pub mod filter;
pub mod query_builder;

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Category, Entry, Feature};
use crate::store::CatalogStore;

/// Longest accepted developer/title search text.
pub const MAX_TEXT_LEN: usize = 50;

/// Validated search constraints. Every field is independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the developer name.
    pub developer: Option<String>,
    /// Case-insensitive substring of the entry name.
    pub title: Option<String>,
    /// Exact category id.
    pub category: Option<i64>,
    pub free: bool,
    pub mac: bool,
    pub windows: bool,
    pub linux: bool,
    /// Entries must carry every one of these features.
    pub features: BTreeSet<i64>,
}

impl SearchCriteria {
    /// True when no constraint is set, i.e. there is nothing to search for.
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of constraints that will narrow the result.
    pub fn active_count(&self) -> usize {
        [
            self.developer.is_some(),
            self.title.is_some(),
            self.category.is_some(),
            self.free,
            self.mac,
            self.windows,
            self.linux,
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
            + self.features.len()
    }
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// No criteria were supplied (or the form was invalid); nothing was queried.
    NotSearched,
    /// Criteria were supplied and nothing matched them.
    NoMatches,
    /// Matching active entries in search order.
    Matches(Vec<Entry>),
}

impl SearchOutcome {
    /// Wrap query rows, dropping repeated ids and mapping "no rows" to
    /// [`SearchOutcome::NoMatches`].
    pub fn from_rows(rows: Vec<Entry>) -> Self {
        let mut seen = BTreeSet::new();
        let entries: Vec<Entry> = rows.into_iter().filter(|e| seen.insert(e.id)).collect();

        if entries.is_empty() {
            Self::NoMatches
        } else {
            Self::Matches(entries)
        }
    }

    /// Matching entries; empty unless this is [`SearchOutcome::Matches`].
    pub fn entries(&self) -> &[Entry] {
        match self {
            Self::Matches(entries) => entries,
            _ => &[],
        }
    }

    /// Stable machine name used by templates and the JSON API.
    pub fn status(&self) -> &'static str {
        match self {
            Self::NotSearched => "not_searched",
            Self::NoMatches => "no_matches",
            Self::Matches(_) => "matches",
        }
    }

    /// Whether a query was actually run.
    pub fn searched(&self) -> bool {
        !matches!(self, Self::NotSearched)
    }
}

/// Field-level validation messages keyed by form field name.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// The answer to one search request: outcome plus the criteria echoed back
/// so the form can be re-rendered with the user's selections.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub criteria: SearchCriteria,
    pub outcome: SearchOutcome,
    pub errors: FieldErrors,
}

impl SearchResult {
    /// A result for a form that was never submitted.
    pub fn blank() -> Self {
        Self {
            criteria: SearchCriteria::default(),
            outcome: SearchOutcome::NotSearched,
            errors: FieldErrors::new(),
        }
    }
}

/// Raw search form input, exactly as submitted.
///
/// Built from a query string or an urlencoded POST body. `features` may
/// repeat, which is why this is parsed by hand instead of through serde.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub developer: String,
    pub title: String,
    pub category: String,
    pub free: bool,
    pub mac: bool,
    pub windows: bool,
    pub linux: bool,
    pub features: Vec<String>,
    submitted: bool,
}

impl SearchForm {
    /// Parse `application/x-www-form-urlencoded` input. Unknown keys are ignored.
    pub fn from_urlencoded(input: &[u8]) -> Self {
        let mut form = Self::default();

        for (key, value) in url::form_urlencoded::parse(input) {
            let value = value.into_owned();
            match key.as_ref() {
                "developer" => form.developer = value,
                "title" => form.title = value,
                "category" => form.category = value,
                "free" => form.free = parse_flag(&value),
                "mac" => form.mac = parse_flag(&value),
                "windows" => form.windows = parse_flag(&value),
                "linux" => form.linux = parse_flag(&value),
                "features" | "feature" => form.features.push(value),
                _ => continue,
            }
            form.submitted = true;
        }

        form
    }

    /// Whether any search field was present in the input.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Treat the form as submitted regardless of which fields were present.
    pub fn mark_submitted(&mut self) {
        self.submitted = true;
    }

    /// Validate into typed criteria.
    ///
    /// Category and feature references that do not parse or do not name a
    /// known row are dropped rather than reported. Over-long text fields are
    /// field errors.
    pub fn validate(
        &self,
        categories: &[Category],
        features: &[Feature],
    ) -> Result<SearchCriteria, FieldErrors> {
        let mut errors = FieldErrors::new();

        let developer = clean_text(&self.developer, "developer", &mut errors);
        let title = clean_text(&self.title, "title", &mut errors);

        let category = self
            .category
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|id| categories.iter().any(|c| c.id == *id));

        let features = self
            .features
            .iter()
            .filter_map(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| features.iter().any(|f| f.id == *id))
            .collect();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(SearchCriteria {
            developer,
            title,
            category,
            free: self.free,
            mac: self.mac,
            windows: self.windows,
            linux: self.linux,
            features,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

fn clean_text(raw: &str, field: &'static str, errors: &mut FieldErrors) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        errors.insert(
            field,
            format!("Ensure this value has at most {MAX_TEXT_LEN} characters."),
        );
        return None;
    }
    Some(trimmed.to_string())
}

/// Validate `form` and run it against `store`.
///
/// Invalid input and empty criteria both yield [`SearchOutcome::NotSearched`];
/// invalid input additionally carries field errors.
pub async fn execute(store: &dyn CatalogStore, form: &SearchForm) -> Result<SearchResult> {
    if !form.is_submitted() {
        return Ok(SearchResult::blank());
    }

    let categories = store.categories().await?;
    let features = store.features().await?;

    let criteria = match form.validate(&categories, &features) {
        Ok(criteria) => criteria,
        Err(errors) => {
            debug!(fields = errors.len(), "search form rejected");
            return Ok(SearchResult {
                criteria: SearchCriteria::default(),
                outcome: SearchOutcome::NotSearched,
                errors,
            });
        }
    };

    let outcome = if criteria.is_empty() {
        SearchOutcome::NotSearched
    } else {
        store.search(&criteria).await?
    };

    debug!(
        criteria = criteria.active_count(),
        matches = outcome.entries().len(),
        status = outcome.status(),
        "search executed"
    );

    Ok(SearchResult {
        criteria,
        outcome,
        errors: FieldErrors::new(),
    })
}
