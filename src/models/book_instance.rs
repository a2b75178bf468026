//! Book instance (physical copy) model and input form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::form::{parse_date, rule_error, EntityForm, FieldError, RawInput};
use super::{format_date, iso_date, Document, Id};

/// Copy availability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    Available,
    #[default]
    Maintenance,
    Loaned,
    Reserved,
}

impl InstanceStatus {
    pub const ALL: [InstanceStatus; 4] = [
        InstanceStatus::Available,
        InstanceStatus::Maintenance,
        InstanceStatus::Loaned,
        InstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "Available",
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::Loaned => "Loaned",
            InstanceStatus::Reserved => "Reserved",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    /// Bootstrap text class used when listing copies
    pub fn css_class(&self) -> &'static str {
        match self {
            InstanceStatus::Available => "text-success",
            InstanceStatus::Maintenance => "text-danger",
            InstanceStatus::Loaned | InstanceStatus::Reserved => "text-warning",
        }
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Book instance document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: Id,
    pub book: Id,
    pub imprint: String,
    pub status: InstanceStatus,
    pub due_back: Option<NaiveDate>,
}

impl BookInstance {
    pub fn due_back_formatted(&self) -> String {
        format_date(self.due_back)
    }

    pub fn due_back_iso(&self) -> String {
        iso_date(self.due_back)
    }

    pub fn is_available(&self) -> bool {
        self.status == InstanceStatus::Available
    }
}

impl Document for BookInstance {
    const COLLECTION: &'static str = "book_instances";
    const ROUTE: &'static str = "bookinstances";
    const KIND: &'static str = "Book copy";

    fn id(&self) -> Id {
        self.id
    }
}

/// A copy that is not on the shelf must say when it comes back.
pub fn due_back_required(instance: &BookInstance) -> Option<FieldError> {
    if instance.status != InstanceStatus::Available && instance.due_back.is_none() {
        Some(FieldError::new(
            "due_back",
            "Date when book available is required unless status is Available.",
        ))
    } else {
        None
    }
}

/// Book instance create/update form
#[derive(Debug, Default, Validate)]
pub struct BookInstanceForm {
    #[validate(
        length(min = 1, message = "Book must be specified"),
        custom(function = "book_reference")
    )]
    pub book: String,
    #[validate(length(min = 1, message = "Imprint must be specified"))]
    pub imprint: String,
    #[validate(custom(function = "known_status"))]
    pub status: String,
    #[validate(custom(function = "due_date"))]
    pub due_back: Option<String>,
}

fn book_reference(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || Id::parse(value).is_some() {
        Ok(())
    } else {
        Err(rule_error("reference", "Book is not a valid selection."))
    }
}

fn known_status(value: &str) -> Result<(), ValidationError> {
    InstanceStatus::parse(value)
        .map(|_| ())
        .ok_or_else(|| rule_error("status", "Status must be Available, Maintenance, Loaned or Reserved"))
}

fn due_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| rule_error("iso8601", "Invalid date"))
}

impl EntityForm for BookInstanceForm {
    type Entity = BookInstance;

    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn normalize(raw: &RawInput) -> Self {
        Self {
            book: raw.text("book"),
            imprint: raw.text("imprint"),
            status: raw.text("status"),
            due_back: raw.optional("due_back"),
        }
    }

    fn into_candidate(self, id: Id) -> BookInstance {
        BookInstance {
            id,
            book: Id::parse(&self.book).unwrap_or_default(),
            imprint: self.imprint,
            status: InstanceStatus::parse(&self.status).unwrap_or_default(),
            due_back: self.due_back.as_deref().and_then(parse_date),
        }
    }
}
