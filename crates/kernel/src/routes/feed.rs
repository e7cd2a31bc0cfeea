//! RSS feed of recent updates.

use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::error::AppResult;
use crate::feed::{FeedChannel, render_rss};
use crate::state::AppState;

/// RSS content type.
pub const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

pub fn router() -> Router<AppState> {
    Router::new().route("/feed/", get(recent_updates_feed))
}

async fn recent_updates_feed(State(state): State<AppState>) -> AppResult<Response> {
    let entries = state.recent_updates().await?;
    let channel = FeedChannel::recent_updates(&state.site().site_url);
    let xml = render_rss(&channel, &entries)?;

    tracing::debug!(items = entries.len(), "rendered recent updates feed");

    Ok(([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], xml).into_response())
}
