//! Book endpoints under `/catalog/books`

use axum::{
    extract::{Path, State},
    Form,
};

use crate::{error::AppResult, services::workflow, views::Page, AppState};

use super::FormBody;

/// GET /catalog/books
pub async fn list(State(state): State<AppState>) -> AppResult<Page> {
    Ok(state.services.books.list().await?.into())
}

/// GET /catalog/books/:id
pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    Ok(state.services.books.detail(&id).await?.into())
}

/// GET /catalog/books/create
pub async fn create_form(State(state): State<AppState>) -> AppResult<Page> {
    workflow::create_form(&state.services.books).await
}

/// POST /catalog/books/create
pub async fn create(State(state): State<AppState>, Form(body): Form<FormBody>) -> AppResult<Page> {
    workflow::create(&state.services.books, &body.into()).await
}

/// GET /catalog/books/:id/update
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::update_form(&state.services.books, &id).await
}

/// POST /catalog/books/:id/update
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(body): Form<FormBody>,
) -> AppResult<Page> {
    workflow::update(&state.services.books, &id, &body.into()).await
}

/// GET /catalog/books/:id/delete
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Page> {
    workflow::delete_form(&state.services.books, &id).await
}

/// POST /catalog/books/:id/delete
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Page> {
    workflow::delete(&state.services.books, &id).await
}
