//! Genre endpoints under `/catalog/genres`

use axum::{
    extract::{Path, State},
    Form,
};

use crate::{error::AppResult, services::workflow, views::Page, AppState};

use super::FormBody;

/// GET /catalog/genres
pub async fn list(State(state): State<AppState>) -> AppResult<Page> {
    Ok(state.services.genres.list().await?.into())
}

/// GET /catalog/genres/:id
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    Ok(state.services.genres.detail(&id).await?.into())
}

/// GET /catalog/genres/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Page> {
    workflow::create_form(&state.services.genres).await
}

/// POST /catalog/genres/create
pub async fn create(State(state): State<AppState>, Form(body): Form<FormBody>) -> AppResult<Page> {
    workflow::create(&state.services.genres, &body.into()).await
}

/// GET /catalog/genres/:id/update
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::update_form(&state.services.genres, &id).await
}

/// POST /catalog/genres/:id/update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(body): Form<FormBody>,
) -> AppResult<Page> {
    workflow::update(&state.services.genres, &id, &body.into()).await
}

/// GET /catalog/genres/:id/delete
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::delete_form(&state.services.genres, &id).await
}

/// POST /catalog/genres/:id/delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    workflow::delete(&state.services.genres, &id).await
}
