//! Book pages

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Author, Book, BookForm, BookInstance, FieldError, Id},
    repository::{EntityStore, Filter, Query, Repository},
    views::{
        genre_options, BookDeleteTemplate, BookDetailTemplate, BookFormTemplate, BookListTemplate,
        BookRow, SelectOption, View,
    },
};

use super::workflow::{require_document, FormMode, Resource};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books by title, each with its author
    pub async fn list(&self) -> AppResult<View> {
        let books = self
            .repository
            .books
            .find(Query::all().sort_by("title"))
            .await?;

        let ids: Vec<Id> = books.iter().map(|b| b.author).collect();
        let authors: HashMap<Id, Author> = self
            .repository
            .authors
            .find(Query::filter(Filter::IdIn(ids)))
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let books = books
            .into_iter()
            .map(|book| BookRow {
                author: authors.get(&book.author).cloned(),
                book,
            })
            .collect();

        Ok(View::BookList(BookListTemplate { books }))
    }

    /// Book with its author, genres and copies
    pub async fn detail(&self, raw_id: &str) -> AppResult<View> {
        let book = require_document(self.repository.books.as_ref(), raw_id).await?;
        let author = self.repository.authors.find_by_id(book.author).await?;
        let genres = self
            .repository
            .genres
            .find(Query::filter(Filter::IdIn(book.genre.clone())).sort_by("name"))
            .await?;
        let instances = self.copies_of(book.id).await?;

        Ok(View::BookDetail(BookDetailTemplate {
            book,
            author,
            genres,
            instances,
        }))
    }

    async fn copies_of(&self, book: Id) -> AppResult<Vec<BookInstance>> {
        self.repository
            .book_instances
            .find(Query::filter(Filter::eq("book", book)))
            .await
    }
}

#[async_trait]
impl Resource for BooksService {
    type Entity = Book;
    type Form = BookForm;

    fn store(&self) -> &dyn EntityStore<Book> {
        self.repository.books.as_ref()
    }

    async fn form_view(
        &self,
        mode: FormMode,
        candidate: Book,
        errors: Vec<FieldError>,
    ) -> AppResult<View> {
        let authors = self
            .repository
            .authors
            .find(Query::all().sort_by("family_name"))
            .await?
            .into_iter()
            .map(|a| SelectOption::new(a.id, a.name(), a.id == candidate.author))
            .collect();
        let genres = self
            .repository
            .genres
            .find(Query::all().sort_by("name"))
            .await?;

        Ok(View::BookForm(BookFormTemplate {
            title: mode.title("Book"),
            genres: genre_options(genres, &candidate),
            authors,
            book: candidate,
            errors,
        }))
    }

    async fn delete_view(&self, book: Book, _dependents: Vec<Book>) -> AppResult<View> {
        let author = self.repository.authors.find_by_id(book.author).await?;
        let instances = self.copies_of(book.id).await?;
        Ok(View::BookDelete(BookDeleteTemplate {
            book,
            author,
            instances,
        }))
    }
}
