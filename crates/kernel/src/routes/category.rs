//! Category listing page.

use axum::{
    Router,
    extract::{Path, State},
    response::Html,
    routing::get,
};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::helpers::render_page;

pub fn router() -> Router<AppState> {
    Router::new().route("/category/{slug}", get(category_listing))
}

/// Active entries of one category, ordered by developer then name.
async fn category_listing(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Html<String>> {
    let category = state
        .store()
        .category_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;
    let entries = state.store().active_entries(Some(category.id)).await?;

    let mut context = tera::Context::new();
    context.insert("heading", &category.name);
    context.insert("category", &category);
    context.insert("entries", &entries);

    render_page(&state, "entry_list.html", context).await
}
