//! Author pages

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Author, AuthorForm, Book, FieldError, Id},
    repository::{EntityStore, Filter, Query, Repository},
    views::{
        AuthorDeleteTemplate, AuthorDetailTemplate, AuthorFormTemplate, AuthorListTemplate, View,
    },
};

use super::workflow::{require_document, FormMode, Resource};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All authors, by family name
    pub async fn list(&self) -> AppResult<View> {
        let authors = self
            .repository
            .authors
            .find(Query::all().sort_by("family_name"))
            .await?;
        Ok(View::AuthorList(AuthorListTemplate { authors }))
    }

    /// Author with their books
    pub async fn detail(&self, raw_id: &str) -> AppResult<View> {
        let author = require_document(self.repository.authors.as_ref(), raw_id).await?;
        let books = self.books_by(author.id).await?;
        Ok(View::AuthorDetail(AuthorDetailTemplate { author, books }))
    }

    async fn books_by(&self, author: Id) -> AppResult<Vec<Book>> {
        self.repository
            .books
            .find(Query::filter(Filter::eq("author", author)))
            .await
    }
}

#[async_trait]
impl Resource for AuthorsService {
    type Entity = Author;
    type Form = AuthorForm;

    fn store(&self) -> &dyn EntityStore<Author> {
        self.repository.authors.as_ref()
    }

    async fn form_view(
        &self,
        mode: FormMode,
        candidate: Author,
        errors: Vec<FieldError>,
    ) -> AppResult<View> {
        Ok(View::AuthorForm(AuthorFormTemplate {
            title: mode.title("Author"),
            author: candidate,
            errors,
        }))
    }

    async fn dependents(&self, id: Id) -> AppResult<Vec<Book>> {
        self.books_by(id).await
    }

    async fn delete_view(&self, author: Author, books: Vec<Book>) -> AppResult<View> {
        Ok(View::AuthorDelete(AuthorDeleteTemplate { author, books }))
    }
}
