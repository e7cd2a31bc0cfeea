//! Search route handlers.
//!
//! `GET /search` without a query string renders the empty form. With a query
//! string, or as a `POST` with an urlencoded body, the form is validated and
//! the search is run. `GET /api/search` accepts the same fields and answers
//! with JSON.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::models::Entry;
use crate::search::{self, FieldErrors, SearchCriteria, SearchForm, SearchResult};
use crate::state::AppState;

use super::helpers::render_page;

/// Create the search router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_get).post(search_post))
        .route("/api/search", get(search_json))
}

/// JSON search response.
#[derive(Debug, Serialize)]
pub struct SearchJsonResponse<'a> {
    pub status: &'static str,
    pub criteria: &'a SearchCriteria,
    pub errors: &'a FieldErrors,
    pub total: usize,
    pub results: &'a [Entry],
}

fn form_from_query(query: Option<String>) -> SearchForm {
    query
        .map(|q| SearchForm::from_urlencoded(q.as_bytes()))
        .unwrap_or_default()
}

async fn search_get(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Html<String>> {
    let form = form_from_query(query);
    search_page(&state, &form).await
}

async fn search_post(State(state): State<AppState>, body: Bytes) -> AppResult<Html<String>> {
    let mut form = SearchForm::from_urlencoded(&body);
    // A posted form counts as submitted even when every box is blank
    form.mark_submitted();
    search_page(&state, &form).await
}

async fn search_page(state: &AppState, form: &SearchForm) -> AppResult<Html<String>> {
    let result = search::execute(state.store(), form).await?;
    let features = state.store().features().await?;

    let mut context = tera::Context::new();
    insert_echo(&mut context, form, &result);
    context.insert("features", &features);
    context.insert("submitted", &form.is_submitted());
    context.insert("status", result.outcome.status());
    context.insert("entries", result.outcome.entries());
    context.insert("errors", &result.errors);

    render_page(state, "search.html", context).await
}

/// Echo the user's selections back into the form.
///
/// Valid input is echoed in normalized form; rejected input is echoed as
/// typed so it can be corrected.
fn insert_echo(context: &mut tera::Context, form: &SearchForm, result: &SearchResult) {
    let criteria = &result.criteria;

    if result.errors.is_empty() {
        context.insert("s_developer", criteria.developer.as_deref().unwrap_or_default());
        context.insert("s_title", criteria.title.as_deref().unwrap_or_default());
    } else {
        context.insert("s_developer", form.developer.trim());
        context.insert("s_title", form.title.trim());
    }

    context.insert("s_category", &criteria.category.unwrap_or(0));
    context.insert("s_free", &criteria.free);
    context.insert("s_mac", &criteria.mac);
    context.insert("s_windows", &criteria.windows);
    context.insert("s_linux", &criteria.linux);
    context.insert("s_features", &criteria.features.iter().collect::<Vec<_>>());
}

/// JSON search endpoint. Invalid input is a 400 carrying the field errors.
async fn search_json(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> AppResult<Response> {
    let form = form_from_query(query);
    let result = search::execute(state.store(), &form).await?;

    let status = if result.errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    let entries = result.outcome.entries();
    let body = SearchJsonResponse {
        status: result.outcome.status(),
        criteria: &result.criteria,
        errors: &result.errors,
        total: entries.len(),
        results: entries,
    };

    Ok((status, Json(body)).into_response())
}
