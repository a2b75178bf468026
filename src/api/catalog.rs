//! Catalog home page

use axum::extract::State;

use crate::{error::AppResult, views::Page, AppState};

/// GET /catalog
pub async fn index(State(state): State<AppState>) -> AppResult<Page> {
    Ok(state.services.catalog.index().await?.into())
}
