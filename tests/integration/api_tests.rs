//! Router integration tests over the in-memory store

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use locallibrary_server::{
    api,
    config::AppConfig,
    models::{Author, Book, Document, Genre, Id},
    repository::{EntityStore, Filter, Repository},
    AppState,
};

fn app() -> (Router, Repository) {
    let repository = Repository::in_memory();
    let router = api::router(AppState::new(AppConfig::default(), repository.clone()));
    (router, repository)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_form(app: Router, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, location, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn insert_genre(repository: &Repository, name: &str) -> Genre {
    repository
        .genres
        .insert(Genre {
            id: Id::new(),
            name: name.to_string(),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = app();
    let (status, _, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_readiness_check() {
    let (app, _) = app();
    let (status, _, body) = get(app, "/ready").await;
    assert_eq!(status, StatusCode::OK);

    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_root_redirects_to_catalog() {
    let (app, _) = app();
    let (status, location, _) = get(app, "/").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog"));
}

#[tokio::test]
async fn test_home_page_counts() {
    let (app, repository) = app();
    insert_genre(&repository, "Fantasy").await;

    let (status, _, body) = get(app, "/catalog").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>Genres:</strong> 1"));
    assert!(body.contains("<strong>Books:</strong> 0"));
}

#[tokio::test]
async fn test_genre_list_is_sorted() {
    let (app, repository) = app();
    insert_genre(&repository, "Poetry").await;
    insert_genre(&repository, "Drama").await;

    let (status, _, body) = get(app, "/catalog/genres").await;
    assert_eq!(status, StatusCode::OK);
    let drama = body.find("Drama").unwrap();
    let poetry = body.find("Poetry").unwrap();
    assert!(drama < poetry);
}

#[tokio::test]
async fn test_create_genre_redirects_to_detail() {
    let (app, repository) = app();
    let (status, location, _) = post_form(app, "/catalog/genres/create", "name=Science+Fiction").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let created = repository
        .genres
        .find_one(Filter::eq("name", "Science Fiction"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(location, Some(created.url()));
}

#[tokio::test]
async fn test_create_duplicate_genre_redirects_to_existing() {
    let (app, repository) = app();
    let fantasy = insert_genre(&repository, "Fantasy").await;

    let (status, location, _) = post_form(app, "/catalog/genres/create", "name=Fantasy").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location, Some(fantasy.url()));
    assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalid_author_redisplays_form() {
    let (app, repository) = app();
    let (status, location, body) = post_form(
        app,
        "/catalog/authors/create",
        "first_name=Ursula&family_name=&date_of_birth=1929-10-21",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("Family name must be specified."));
    assert!(body.contains("Ursula"));
    assert_eq!(repository.authors.count(Filter::All).await.unwrap(), 0);
}

#[tokio::test]
async fn test_book_with_many_genres() {
    let (app, repository) = app();
    let author = repository
        .authors
        .insert(Author {
            id: Id::new(),
            first_name: "Ursula".to_string(),
            family_name: "LeGuin".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let fantasy = insert_genre(&repository, "Fantasy").await;
    let poetry = insert_genre(&repository, "Poetry").await;

    let body = format!(
        "title=Earthsea&author={}&summary=Wizards&isbn=123&genre={}&genre={}",
        author.id, fantasy.id, poetry.id
    );
    let (status, _, _) = post_form(app, "/catalog/books/create", &body).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let books: Vec<Book> = repository
        .books
        .find(locallibrary_server::repository::Query::all())
        .await
        .unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].genre, vec![fantasy.id, poetry.id]);
}

#[tokio::test]
async fn test_missing_book_detail_is_not_found() {
    let (app, _) = app();
    let (status, _, body) = get(app, &format!("/catalog/books/{}", Id::new())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Book not found"));
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let (app, _) = app();
    let (status, _, _) = get(app, "/catalog/authors/not-an-id/update").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_page_for_missing_genre_redirects_to_list() {
    let (app, _) = app();
    let (status, location, _) = get(app, &format!("/catalog/genres/{}/delete", Id::new())).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/genres"));
}

#[tokio::test]
async fn test_delete_referenced_genre_shows_confirmation() {
    let (app, repository) = app();
    let fantasy = insert_genre(&repository, "Fantasy").await;
    repository
        .books
        .insert(Book {
            id: Id::new(),
            title: "The Hobbit".to_string(),
            genre: vec![fantasy.id],
            ..Default::default()
        })
        .await
        .unwrap();

    let uri = format!("/catalog/genres/{}/delete", fantasy.id);
    let (status, location, body) = post_form(app, &uri, "").await;
    assert_eq!(status, StatusCode::OK);
    assert!(location.is_none());
    assert!(body.contains("The Hobbit"));
    assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_unreferenced_genre() {
    let (app, repository) = app();
    let fantasy = insert_genre(&repository, "Fantasy").await;

    let uri = format!("/catalog/genres/{}/delete", fantasy.id);
    let (status, location, _) = post_form(app, &uri, "").await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(location.as_deref(), Some("/catalog/genres"));
    assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 0);
}
