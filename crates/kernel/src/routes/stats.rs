//! Catalog statistics page.

use axum::{Router, extract::State, response::Html, routing::get};

use crate::error::AppResult;
use crate::state::AppState;

use super::helpers::render_page;

pub fn router() -> Router<AppState> {
    Router::new().route("/stats", get(stats_page))
}

async fn stats_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let stats = state.store().stats().await?;

    let mut context = tera::Context::new();
    context.insert("stats", &stats);

    render_page(&state, "stats.html", context).await
}
