//! Book model and input form

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::form::{rule_error, EntityForm, RawInput};
use super::{Document, Id};

/// Book document. `author` and `genre` reference other collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Id,
    pub title: String,
    pub author: Id,
    pub summary: String,
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<Id>,
}

impl Book {
    pub fn has_genre(&self, genre: Id) -> bool {
        self.genre.contains(&genre)
    }
}

impl Document for Book {
    const COLLECTION: &'static str = "books";
    const ROUTE: &'static str = "books";
    const KIND: &'static str = "Book";

    fn id(&self) -> Id {
        self.id
    }
}

/// Book create/update form
#[derive(Debug, Default, Validate)]
pub struct BookForm {
    #[validate(length(min = 1, message = "Title must not be empty."))]
    pub title: String,
    #[validate(
        length(min = 1, message = "Author must not be empty."),
        custom(function = "author_reference")
    )]
    pub author: String,
    #[validate(length(min = 1, message = "Summary must not be empty."))]
    pub summary: String,
    #[validate(length(min = 1, message = "ISBN must not be empty."))]
    pub isbn: String,
    /// Selected genre ids, zero or more
    #[validate(custom(function = "genre_references"))]
    pub genre: Vec<String>,
}

fn author_reference(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Id::parse(value).is_some() {
        Ok(())
    } else {
        Err(rule_error("reference", "Author is not a valid selection."))
    }
}

fn genre_references(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| Id::parse(v).is_some()) {
        Ok(())
    } else {
        Err(rule_error("reference", "Genre is not a valid selection."))
    }
}

impl EntityForm for BookForm {
    type Entity = Book;

    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn normalize(raw: &RawInput) -> Self {
        Self {
            title: raw.text("title"),
            author: raw.text("author"),
            summary: raw.text("summary"),
            isbn: raw.text("isbn"),
            genre: raw.list("genre"),
        }
    }

    fn into_candidate(self, id: Id) -> Book {
        Book {
            id,
            title: self.title,
            // An unusable author id leaves the reference unset; the rule above reports it.
            author: Id::parse(&self.author).unwrap_or_default(),
            summary: self.summary,
            isbn: self.isbn,
            genre: self.genre.iter().filter_map(|g| Id::parse(g)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::field_errors;

    #[test]
    fn test_genre_shapes_normalize_to_list() {
        let (a, b) = (Id::new(), Id::new());

        let none: RawInput = [("title", "T")].into_iter().collect();
        assert!(BookForm::normalize(&none).genre.is_empty());

        let one: RawInput = [("genre", a.to_string())]
            .into_iter()
            .collect();
        assert_eq!(BookForm::normalize(&one).into_candidate(Id::new()).genre, vec![a]);

        let many: RawInput = [("genre", a.to_string()), ("genre", b.to_string())]
            .into_iter()
            .collect();
        assert_eq!(
            BookForm::normalize(&many).into_candidate(Id::new()).genre,
            vec![a, b]
        );
    }

    #[test]
    fn test_empty_fields_reported_in_form_order() {
        let raw: RawInput = [("title", ""), ("author", ""), ("summary", "s"), ("isbn", "")]
            .into_iter()
            .collect();
        let form = BookForm::normalize(&raw);
        let fields: Vec<String> = field_errors(form.validate(), BookForm::FIELDS)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(fields, vec!["title", "author", "isbn"]);
    }

    #[test]
    fn test_garbage_author_reference() {
        let raw: RawInput = [
            ("title", "T"),
            ("author", "nobody"),
            ("summary", "S"),
            ("isbn", "I"),
        ]
        .into_iter()
        .collect();
        let form = BookForm::normalize(&raw);
        let errors = field_errors(form.validate(), BookForm::FIELDS);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Author is not a valid selection.");
        assert_eq!(form.into_candidate(Id::new()).author, Id::default());
    }

    #[test]
    fn test_garbage_genre_reference() {
        let good = Id::new().to_string();
        let raw: RawInput = [
            ("title", "T"),
            ("author", good.as_str()),
            ("summary", "S"),
            ("isbn", "I"),
            ("genre", good.as_str()),
            ("genre", "not-a-genre"),
        ]
        .into_iter()
        .collect();
        let form = BookForm::normalize(&raw);
        let errors = field_errors(form.validate(), BookForm::FIELDS);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "genre");
        assert_eq!(errors[0].message, "Genre is not a valid selection.");
    }

    #[test]
    fn test_has_genre() {
        let genre = Id::new();
        let book = Book {
            genre: vec![genre],
            ..Default::default()
        };
        assert!(book.has_genre(genre));
        assert!(!book.has_genre(Id::new()));
    }
}
