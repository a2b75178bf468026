//! HTTP handlers for the catalog pages

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;

use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::AppState;

/// Urlencoded form body as ordered key/value pairs, so repeated keys survive
pub type FormBody = Vec<(String, String)>;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Books
        .route("/books", get(books::list))
        .route("/books/create", get(books::create_form).post(books::create))
        .route("/books/:id", get(books::detail))
        .route("/books/:id/update", get(books::update_form).post(books::update))
        .route("/books/:id/delete", get(books::delete_form).post(books::delete))
        // Authors
        .route("/authors", get(authors::list))
        .route("/authors/create", get(authors::create_form).post(authors::create))
        .route("/authors/:id", get(authors::detail))
        .route("/authors/:id/update", get(authors::update_form).post(authors::update))
        .route("/authors/:id/delete", get(authors::delete_form).post(authors::delete))
        // Genres
        .route("/genres", get(genres::list))
        .route("/genres/create", get(genres::create_form).post(genres::create))
        .route("/genres/:id", get(genres::detail))
        .route("/genres/:id/update", get(genres::update_form).post(genres::update))
        .route("/genres/:id/delete", get(genres::delete_form).post(genres::delete))
        // Book copies
        .route("/bookinstances", get(book_instances::list))
        .route(
            "/bookinstances/create",
            get(book_instances::create_form).post(book_instances::create),
        )
        .route("/bookinstances/:id", get(book_instances::detail))
        .route(
            "/bookinstances/:id/update",
            get(book_instances::update_form).post(book_instances::update),
        )
        .route(
            "/bookinstances/:id/delete",
            get(book_instances::delete_form).post(book_instances::delete),
        );

    Router::new()
        .route("/", get(|| async { Redirect::to("/catalog") }))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
}
