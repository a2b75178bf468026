//! Book copy endpoints under `/catalog/bookinstances`

use axum::{
    extract::{Path, State},
    Form,
};

use crate::{error::AppResult, services::workflow, views::Page, AppState};

use super::FormBody;

/// GET /catalog/bookinstances
pub async fn list(State(state): State<AppState>) -> AppResult<Page> {
    Ok(state.services.book_instances.list().await?.into())
}

/// GET /catalog/bookinstances/:id
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    Ok(state.services.book_instances.detail(&id).await?.into())
}

/// GET /catalog/bookinstances/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Page> {
    workflow::create_form(&state.services.book_instances).await
}

/// POST /catalog/bookinstances/create
pub async fn create(State(state): State<AppState>, Form(body): Form<FormBody>) -> AppResult<Page> {
    workflow::create(&state.services.book_instances, &body.into()).await
}

/// GET /catalog/bookinstances/:id/update
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::update_form(&state.services.book_instances, &id).await
}

/// POST /catalog/bookinstances/:id/update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(body): Form<FormBody>,
) -> AppResult<Page> {
    workflow::update(&state.services.book_instances, &id, &body.into()).await
}

/// GET /catalog/bookinstances/:id/delete
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::delete_form(&state.services.book_instances, &id).await
}

/// POST /catalog/bookinstances/:id/delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    workflow::delete(&state.services.book_instances, &id).await
}
