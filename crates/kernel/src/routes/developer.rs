//! Developer pages and the developer-name autocomplete endpoint.

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Html,
    routing::get,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

use super::helpers::render_page;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/developers", get(developer_list))
        .route("/developer/{slug}", get(developer_detail))
        .route("/api/developers", get(developer_names))
}

/// Autocomplete payload.
#[derive(Debug, Serialize)]
struct DeveloperNamesResponse {
    status: u16,
    data: Vec<String>,
}

async fn developer_list(State(state): State<AppState>) -> AppResult<Html<String>> {
    let developers = state.store().developers().await?;

    let mut context = tera::Context::new();
    context.insert("developers", &developers);

    render_page(&state, "developer_list.html", context).await
}

async fn developer_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Html<String>> {
    let developer = state
        .store()
        .developer_by_slug(&slug)
        .await?
        .ok_or(AppError::NotFound)?;
    let entries = state.store().developer_entries(developer.id).await?;

    let mut context = tera::Context::new();
    context.insert("developer", &developer);
    context.insert("entries", &entries);

    render_page(&state, "developer.html", context).await
}

/// Distinct developer names, case-insensitive order.
async fn developer_names(State(state): State<AppState>) -> AppResult<Json<DeveloperNamesResponse>> {
    let data = state.store().developer_names().await?;
    Ok(Json(DeveloperNamesResponse { status: 200, data }))
}
