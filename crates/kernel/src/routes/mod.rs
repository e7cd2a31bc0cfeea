//! HTTP route handlers.

pub mod category;
pub mod developer;
pub mod entry;
pub mod feed;
pub mod front;
pub mod health;
pub mod helpers;
pub mod search;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// All public routes, without middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(front::router())
        .merge(entry::router())
        .merge(developer::router())
        .merge(category::router())
        .merge(search::router())
        .merge(stats::router())
        .merge(feed::router())
        .merge(health::router())
}
