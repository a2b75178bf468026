//! Genre model and input form

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::form::{EntityForm, RawInput};
use super::{Document, Id};

/// Genre document. Names are unique across the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Id,
    pub name: String,
}

impl Document for Genre {
    const COLLECTION: &'static str = "genres";
    const ROUTE: &'static str = "genres";
    const KIND: &'static str = "Genre";

    fn id(&self) -> Id {
        self.id
    }
}

#[derive(Debug, Default, Validate)]
pub struct GenreForm {
    #[validate(length(min = 1, message = "Genre name must not be empty."))]
    pub name: String,
}

impl EntityForm for GenreForm {
    type Entity = Genre;

    const FIELDS: &'static [&'static str] = &["name"];

    fn normalize(raw: &RawInput) -> Self {
        Self {
            name: raw.text("name"),
        }
    }

    fn into_candidate(self, id: Id) -> Genre {
        Genre {
            id,
            name: self.name,
        }
    }
}
