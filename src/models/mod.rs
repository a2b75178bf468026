//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod form;
pub mod genre;

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

// Re-export commonly used types
pub use author::{Author, AuthorForm};
pub use book::{Book, BookForm};
pub use book_instance::{BookInstance, BookInstanceForm, InstanceStatus};
pub use form::{EntityForm, FieldError, RawInput, RawValue};
pub use genre::{Genre, GenreForm};

/// Document identifier
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    /// Allocate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from a path segment or form value.
    /// Returns `None` for anything that is not a UUID.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for Id {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<Id> for serde_json::Value {
    fn from(id: Id) -> Self {
        serde_json::Value::String(id.to_string())
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document stored in one of the catalog collections.
///
/// Every document owns its identifier and has a canonical location
/// of the shape `/catalog/<ROUTE>/<id>`.
pub trait Document:
    Serialize + DeserializeOwned + Clone + Default + Send + Sync + Unpin + 'static
{
    /// Collection (table) name
    const COLLECTION: &'static str;
    /// Plural path segment under `/catalog`
    const ROUTE: &'static str;
    /// Name used in messages ("Book", "Author", ...)
    const KIND: &'static str;

    fn id(&self) -> Id;

    fn url(&self) -> String {
        format!("/catalog/{}/{}", Self::ROUTE, self.id())
    }

    fn list_url() -> String {
        format!("/catalog/{}", Self::ROUTE)
    }
}

/// Display format for dates, e.g. "Oct 19, 2026"
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

/// `yyyy-mm-dd` value for date inputs
pub fn iso_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parse() {
        let id = Id::new();
        assert_eq!(Id::parse(&id.to_string()), Some(id));
        assert_eq!(Id::parse("not-an-id"), None);
        assert_eq!(Id::parse(""), None);
    }

    #[test]
    fn test_date_formats() {
        let date = NaiveDate::from_ymd_opt(1920, 1, 2);
        assert_eq!(format_date(date), "Jan 2, 1920");
        assert_eq!(iso_date(date), "1920-01-02");
        assert_eq!(format_date(None), "");
    }

    #[test]
    fn test_canonical_locations() {
        let genre = Genre {
            id: Id::new(),
            name: "Poetry".to_string(),
        };
        assert_eq!(genre.url(), format!("/catalog/genres/{}", genre.id));
        assert_eq!(Genre::list_url(), "/catalog/genres");
        assert_eq!(BookInstance::list_url(), "/catalog/bookinstances");
    }
}
