//! Front page route handler.

use axum::{Router, extract::State, response::Html, routing::get};

use crate::error::AppResult;
use crate::state::AppState;

use super::helpers::render_page;

/// Create the front page router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(front_page))
}

/// Front page: the `home_intro` snippet and recent updates.
async fn front_page(State(state): State<AppState>) -> AppResult<Html<String>> {
    let recent = state.recent_updates().await?;

    let mut context = tera::Context::new();
    context.insert("recent", &recent);
    context.insert("recent_days", &state.site().recent_updates_days);

    render_page(&state, "home.html", context).await
}
