//! Shared route helpers for page rendering.

use axum::response::Html;

use crate::error::AppResult;
use crate::models::SnippetSet;
use crate::state::AppState;

/// Inject site-wide context variables into a Tera context.
///
/// Adds: `site_name`, `categories` (navigation order), `snippets`
pub async fn inject_site_context(state: &AppState, context: &mut tera::Context) -> AppResult<()> {
    let categories = state.store().categories().await?;
    let snippets: SnippetSet = state.store().snippets().await?.into_iter().collect();

    context.insert("site_name", &state.site().site_name);
    context.insert("categories", &categories);
    context.insert("snippets", &snippets);

    Ok(())
}

/// Render a page template with the site-wide context.
pub async fn render_page(
    state: &AppState,
    template: &str,
    mut context: tera::Context,
) -> AppResult<Html<String>> {
    inject_site_context(state, &mut context).await?;

    let html = state.theme().render(template, &context)?;
    Ok(Html(html))
}
