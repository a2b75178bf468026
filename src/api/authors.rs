//! Author endpoints under `/catalog/authors`

use axum::{
    extract::{Path, State},
    Form,
};

use crate::{error::AppResult, services::workflow, views::Page, AppState};

use super::FormBody;

/// GET /catalog/authors
pub async fn list(State(state): State<AppState>) -> AppResult<Page> {
    Ok(state.services.authors.list().await?.into())
}

/// GET /catalog/authors/:id
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    Ok(state.services.authors.detail(&id).await?.into())
}

/// GET /catalog/authors/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Page> {
    workflow::create_form(&state.services.authors).await
}

/// POST /catalog/authors/create
pub async fn create(State(state): State<AppState>, Form(body): Form<FormBody>) -> AppResult<Page> {
    workflow::create(&state.services.authors, &body.into()).await
}

/// GET /catalog/authors/:id/update
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::update_form(&state.services.authors, &id).await
}

/// POST /catalog/authors/:id/update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(body): Form<FormBody>,
) -> AppResult<Page> {
    workflow::update(&state.services.authors, &id, &body.into()).await
}

/// GET /catalog/authors/:id/delete
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::delete_form(&state.services.authors, &id).await
}

/// POST /catalog/authors/:id/delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    workflow::delete(&state.services.authors, &id).await
}
