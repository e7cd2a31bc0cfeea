//! Entry detail and full software listing.

use axum::{
    Router,
    extract::{Path, State},
    response::Html,
    routing::get,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::theme::helpers::osses_label;

use super::helpers::render_page;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/software", get(list_entries))
        .route("/software/{id}", get(entry_detail))
}

/// Entry detail page. Non-numeric and unknown ids are both 404.
async fn entry_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Html<String>> {
    let id: i64 = id.parse().map_err(|_| AppError::NotFound)?;
    let entry = state.store().entry(id).await?.ok_or(AppError::NotFound)?;
    let features = state.store().entry_features(entry.id).await?;

    let mut context = tera::Context::new();
    context.insert("osses", &osses_label(&entry));
    context.insert("entry", &entry);
    context.insert("features", &features);

    render_page(&state, "entry.html", context).await
}

/// Every active entry, ordered like a category listing.
async fn list_entries(State(state): State<AppState>) -> AppResult<Html<String>> {
    let entries = state.store().active_entries(None).await?;

    let mut context = tera::Context::new();
    context.insert("heading", "All Software");
    context.insert("category", &None::<()>);
    context.insert("entries", &entries);

    render_page(&state, "entry_list.html", context).await
}
