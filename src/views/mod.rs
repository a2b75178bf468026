//! HTML views
//!
//! Each view is an askama template plus the data it renders. Controllers
//! answer with a [`Page`]: either a view to render or a location to redirect to.

use askama::Template;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::{
    error::AppError,
    models::{Author, Book, BookInstance, Document, FieldError, Genre, Id, InstanceStatus},
};

/// Outcome of a controller action
#[derive(Debug)]
pub enum Page {
    Render(View),
    Redirect(String),
}

impl Page {
    pub fn redirect(location: impl Into<String>) -> Self {
        Page::Redirect(location.into())
    }

    /// The redirect target, if this page is a redirect
    pub fn location(&self) -> Option<&str> {
        match self {
            Page::Redirect(location) => Some(location),
            Page::Render(_) => None,
        }
    }

    /// The view to render, if this page is not a redirect
    pub fn view(&self) -> Option<&View> {
        match self {
            Page::Render(view) => Some(view),
            Page::Redirect(_) => None,
        }
    }
}

impl From<View> for Page {
    fn from(view: View) -> Self {
        Page::Render(view)
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        match self {
            Page::Render(view) => match view.render() {
                Ok(html) => Html(html).into_response(),
                Err(e) => {
                    tracing::error!("Failed to render {}: {}", view.name(), e);
                    AppError::from(e).into_response()
                }
            },
            Page::Redirect(location) => Redirect::to(&location).into_response(),
        }
    }
}

// ---------------------------------------------------------------------------
// Populated rows and form options
// ---------------------------------------------------------------------------

/// Book with its author resolved
#[derive(Debug, Clone)]
pub struct BookRow {
    pub book: Book,
    pub author: Option<Author>,
}

/// Copy with its book resolved
#[derive(Debug, Clone)]
pub struct InstanceRow {
    pub instance: BookInstance,
    pub book: Option<Book>,
}

/// Entry of a single-select list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl ToString, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.into(),
            selected,
        }
    }
}

/// Genre checkbox on the book form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreOption {
    pub id: Id,
    pub name: String,
    pub checked: bool,
}

/// Mark each genre that the book currently selects
pub fn genre_options(genres: Vec<Genre>, book: &Book) -> Vec<GenreOption> {
    genres
        .into_iter()
        .map(|g| GenreOption {
            checked: book.has_genre(g.id),
            id: g.id,
            name: g.name,
        })
        .collect()
}

pub fn status_options(current: InstanceStatus) -> Vec<SelectOption> {
    InstanceStatus::ALL
        .into_iter()
        .map(|s| SelectOption::new(s, s.as_str(), s == current))
        .collect()
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Template, Debug)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Template, Debug)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub message: String,
}

#[derive(Template, Debug)]
#[template(path = "book_list.html")]
pub struct BookListTemplate {
    pub books: Vec<BookRow>,
}

#[derive(Template, Debug)]
#[template(path = "book_detail.html")]
pub struct BookDetailTemplate {
    pub book: Book,
    pub author: Option<Author>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstance>,
}

#[derive(Template, Debug)]
#[template(path = "book_form.html")]
pub struct BookFormTemplate {
    pub title: String,
    pub book: Book,
    pub authors: Vec<SelectOption>,
    pub genres: Vec<GenreOption>,
    pub errors: Vec<FieldError>,
}

#[derive(Template, Debug)]
#[template(path = "book_delete.html")]
pub struct BookDeleteTemplate {
    pub book: Book,
    pub author: Option<Author>,
    pub instances: Vec<BookInstance>,
}

#[derive(Template, Debug)]
#[template(path = "author_list.html")]
pub struct AuthorListTemplate {
    pub authors: Vec<Author>,
}

#[derive(Template, Debug)]
#[template(path = "author_detail.html")]
pub struct AuthorDetailTemplate {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Template, Debug)]
#[template(path = "author_form.html")]
pub struct AuthorFormTemplate {
    pub title: String,
    pub author: Author,
    pub errors: Vec<FieldError>,
}

#[derive(Template, Debug)]
#[template(path = "author_delete.html")]
pub struct AuthorDeleteTemplate {
    pub author: Author,
    pub books: Vec<Book>,
}

#[derive(Template, Debug)]
#[template(path = "genre_list.html")]
pub struct GenreListTemplate {
    pub genres: Vec<Genre>,
}

#[derive(Template, Debug)]
#[template(path = "genre_detail.html")]
pub struct GenreDetailTemplate {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Template, Debug)]
#[template(path = "genre_form.html")]
pub struct GenreFormTemplate {
    pub title: String,
    pub genre: Genre,
    pub errors: Vec<FieldError>,
}

#[derive(Template, Debug)]
#[template(path = "genre_delete.html")]
pub struct GenreDeleteTemplate {
    pub genre: Genre,
    pub books: Vec<Book>,
}

#[derive(Template, Debug)]
#[template(path = "bookinstance_list.html")]
pub struct BookInstanceListTemplate {
    pub instances: Vec<InstanceRow>,
}

#[derive(Template, Debug)]
#[template(path = "bookinstance_detail.html")]
pub struct BookInstanceDetailTemplate {
    pub instance: BookInstance,
    pub book: Option<Book>,
}

#[derive(Template, Debug)]
#[template(path = "bookinstance_form.html")]
pub struct BookInstanceFormTemplate {
    pub title: String,
    pub instance: BookInstance,
    pub books: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub errors: Vec<FieldError>,
}

#[derive(Template, Debug)]
#[template(path = "bookinstance_delete.html")]
pub struct BookInstanceDeleteTemplate {
    pub instance: BookInstance,
    pub book: Option<Book>,
}

/// A named view and its data
#[derive(Debug)]
pub enum View {
    Index(IndexTemplate),
    BookList(BookListTemplate),
    BookDetail(BookDetailTemplate),
    BookForm(BookFormTemplate),
    BookDelete(BookDeleteTemplate),
    AuthorList(AuthorListTemplate),
    AuthorDetail(AuthorDetailTemplate),
    AuthorForm(AuthorFormTemplate),
    AuthorDelete(AuthorDeleteTemplate),
    GenreList(GenreListTemplate),
    GenreDetail(GenreDetailTemplate),
    GenreForm(GenreFormTemplate),
    GenreDelete(GenreDeleteTemplate),
    BookInstanceList(BookInstanceListTemplate),
    BookInstanceDetail(BookInstanceDetailTemplate),
    BookInstanceForm(BookInstanceFormTemplate),
    BookInstanceDelete(BookInstanceDeleteTemplate),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Index(_) => "index",
            View::BookList(_) => "book_list",
            View::BookDetail(_) => "book_detail",
            View::BookForm(_) => "book_form",
            View::BookDelete(_) => "book_delete",
            View::AuthorList(_) => "author_list",
            View::AuthorDetail(_) => "author_detail",
            View::AuthorForm(_) => "author_form",
            View::AuthorDelete(_) => "author_delete",
            View::GenreList(_) => "genre_list",
            View::GenreDetail(_) => "genre_detail",
            View::GenreForm(_) => "genre_form",
            View::GenreDelete(_) => "genre_delete",
            View::BookInstanceList(_) => "bookinstance_list",
            View::BookInstanceDetail(_) => "bookinstance_detail",
            View::BookInstanceForm(_) => "bookinstance_form",
            View::BookInstanceDelete(_) => "bookinstance_delete",
        }
    }

    pub fn render(&self) -> askama::Result<String> {
        match self {
            View::Index(t) => t.render(),
            View::BookList(t) => t.render(),
            View::BookDetail(t) => t.render(),
            View::BookForm(t) => t.render(),
            View::BookDelete(t) => t.render(),
            View::AuthorList(t) => t.render(),
            View::AuthorDetail(t) => t.render(),
            View::AuthorForm(t) => t.render(),
            View::AuthorDelete(t) => t.render(),
            View::GenreList(t) => t.render(),
            View::GenreDetail(t) => t.render(),
            View::GenreForm(t) => t.render(),
            View::GenreDelete(t) => t.render(),
            View::BookInstanceList(t) => t.render(),
            View::BookInstanceDetail(t) => t.render(),
            View::BookInstanceForm(t) => t.render(),
            View::BookInstanceDelete(t) => t.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_options_mark_selection() {
        let (a, b) = (
            Genre {
                id: Id::new(),
                name: "Fantasy".to_string(),
            },
            Genre {
                id: Id::new(),
                name: "Poetry".to_string(),
            },
        );
        let book = Book {
            genre: vec![b.id],
            ..Default::default()
        };
        let options = genre_options(vec![a, b], &book);
        assert!(!options[0].checked);
        assert!(options[1].checked);
    }

    #[test]
    fn test_form_redisplay_escapes_user_input() {
        let page = GenreFormTemplate {
            title: "Create Genre".to_string(),
            genre: Genre {
                id: Id::new(),
                name: "<script>".to_string(),
            },
            errors: vec![FieldError::new("name", "Genre name must not be empty.")],
        };
        let html = page.render().unwrap();
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Genre name must not be empty."));
    }

    #[test]
    fn test_error_page_shows_status() {
        let html = ErrorTemplate {
            status: 404,
            message: "Book not found".to_string(),
        }
        .render()
        .unwrap();
        assert!(html.contains("404"));
        assert!(html.contains("Book not found"));
    }
}
