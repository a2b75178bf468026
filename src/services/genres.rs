//! Genre pages

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, FieldError, Genre, GenreForm, Id},
    repository::{EntityStore, Filter, Query, Repository},
    views::{GenreDeleteTemplate, GenreDetailTemplate, GenreFormTemplate, GenreListTemplate, View},
};

use super::workflow::{require_document, FormMode, Resource};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All genres, by name
    pub async fn list(&self) -> AppResult<View> {
        let genres = self
            .repository
            .genres
            .find(Query::all().sort_by("name"))
            .await?;
        Ok(View::GenreList(GenreListTemplate { genres }))
    }

    /// Genre with the books filed under it
    pub async fn detail(&self, raw_id: &str) -> AppResult<View> {
        let genre = require_document(self.repository.genres.as_ref(), raw_id).await?;
        let books = self.books_in(genre.id).await?;
        Ok(View::GenreDetail(GenreDetailTemplate { genre, books }))
    }

    async fn books_in(&self, genre: Id) -> AppResult<Vec<Book>> {
        self.repository
            .books
            .find(Query::filter(Filter::contains("genre", genre)))
            .await
    }
}

#[async_trait]
impl Resource for GenresService {
    type Entity = Genre;
    type Form = GenreForm;

    fn store(&self) -> &dyn EntityStore<Genre> {
        self.repository.genres.as_ref()
    }

    async fn form_view(
        &self,
        mode: FormMode,
        candidate: Genre,
        errors: Vec<FieldError>,
    ) -> AppResult<View> {
        Ok(View::GenreForm(GenreFormTemplate {
            title: mode.title("Genre"),
            genre: candidate,
            errors,
        }))
    }

    /// Exact, case-sensitive name match
    async fn find_equivalent(&self, candidate: &Genre) -> AppResult<Option<Genre>> {
        self.repository
            .genres
            .find_one(Filter::eq("name", candidate.name.as_str()))
            .await
    }

    async fn dependents(&self, id: Id) -> AppResult<Vec<Book>> {
        self.books_in(id).await
    }

    async fn delete_view(&self, genre: Genre, books: Vec<Book>) -> AppResult<View> {
        Ok(View::GenreDelete(GenreDeleteTemplate { genre, books }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::AppError,
        models::{Document, RawInput},
        services::workflow,
    };

    async fn seeded() -> (GenresService, Repository, Genre) {
        let repository = Repository::in_memory();
        let fantasy = repository
            .genres
            .insert(Genre {
                id: Id::new(),
                name: "Fantasy".to_string(),
            })
            .await
            .unwrap();
        (GenresService::new(repository.clone()), repository, fantasy)
    }

    fn input(name: &str) -> RawInput {
        [("name", name)].into_iter().collect()
    }

    #[tokio::test]
    async fn test_create_redirects_to_new_genre() {
        let (genres, repository, _) = seeded().await;
        let page = workflow::create(&genres, &input("Poetry")).await.unwrap();

        let created = repository
            .genres
            .find_one(Filter::eq("name", "Poetry"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.location(), Some(created.url().as_str()));
        assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_duplicate_redirects_to_existing() {
        let (genres, repository, fantasy) = seeded().await;
        let page = workflow::create(&genres, &input("Fantasy")).await.unwrap();

        assert_eq!(page.location(), Some(fantasy.url().as_str()));
        assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_check_is_case_sensitive() {
        let (genres, repository, _) = seeded().await;
        workflow::create(&genres, &input("fantasy")).await.unwrap();
        assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_create_blank_name_redisplays_form() {
        let (genres, repository, _) = seeded().await;
        let page = workflow::create(&genres, &input("   ")).await.unwrap();
        assert_eq!(page.view().map(View::name), Some("genre_form"));

        let Some(View::GenreForm(form)) = page.view() else {
            panic!("expected the genre form");
        };
        assert_eq!(form.title, "Create Genre");
        assert_eq!(form.errors[0].message, "Genre name must not be empty.");
        assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_to_existing_name_redirects_without_writing() {
        let (genres, repository, fantasy) = seeded().await;
        let poetry = repository
            .genres
            .insert(Genre {
                id: Id::new(),
                name: "Poetry".to_string(),
            })
            .await
            .unwrap();

        let page = workflow::update(&genres, &poetry.id.to_string(), &input("Fantasy"))
            .await
            .unwrap();
        assert_eq!(page.location(), Some(fantasy.url().as_str()));

        let unchanged = repository.genres.find_by_id(poetry.id).await.unwrap().unwrap();
        assert_eq!(unchanged.name, "Poetry");
    }

    #[tokio::test]
    async fn test_update_keeps_identity() {
        let (genres, repository, fantasy) = seeded().await;
        let page = workflow::update(&genres, &fantasy.id.to_string(), &input("High Fantasy"))
            .await
            .unwrap();
        assert_eq!(page.location(), Some(fantasy.url().as_str()));

        let renamed = repository.genres.find_by_id(fantasy.id).await.unwrap().unwrap();
        assert_eq!(renamed.name, "High Fantasy");
        assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_blocked_while_books_reference_genre() {
        let (genres, repository, fantasy) = seeded().await;
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

        let page = workflow::delete(&genres, &fantasy.id.to_string()).await.unwrap();
        let Some(View::GenreDelete(confirm)) = page.view() else {
            panic!("expected the delete confirmation");
        };
        assert_eq!(confirm.books.len(), 1);
        assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_delete_unreferenced_genre() {
        let (genres, repository, fantasy) = seeded().await;
        let page = workflow::delete(&genres, &fantasy.id.to_string()).await.unwrap();
        assert_eq!(page.location(), Some("/catalog/genres"));
        assert_eq!(repository.genres.count(Filter::All).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_detail_of_missing_genre() {
        let (genres, _, _) = seeded().await;
        let result = genres.detail(&Id::new().to_string()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let (genres, repository, _) = seeded().await;
        for name in ["Poetry", "Drama"] {
            repository
                .genres
                .insert(Genre {
                    id: Id::new(),
                    name: name.to_string(),
                })
                .await
                .unwrap();
        }
        let View::GenreList(list) = genres.list().await.unwrap() else {
            panic!("expected the genre list");
        };
        let names: Vec<&str> = list.genres.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Drama", "Fantasy", "Poetry"]);
    }
}
