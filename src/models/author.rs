//! Author model and input form

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::form::{is_alphanumeric, parse_date, rule_error, EntityForm, RawInput};
use super::{format_date, iso_date, Document, Id};

/// Author document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Id,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// "Family, First", or empty when either name is missing
    pub fn name(&self) -> String {
        if self.first_name.is_empty() || self.family_name.is_empty() {
            return String::new();
        }
        format!("{}, {}", self.family_name, self.first_name)
    }

    pub fn lifespan(&self) -> String {
        format!(
            "{} - {}",
            format_date(self.date_of_birth),
            format_date(self.date_of_death)
        )
    }

    pub fn date_of_birth_iso(&self) -> String {
        iso_date(self.date_of_birth)
    }

    pub fn date_of_death_iso(&self) -> String {
        iso_date(self.date_of_death)
    }
}

impl Document for Author {
    const COLLECTION: &'static str = "authors";
    const ROUTE: &'static str = "authors";
    const KIND: &'static str = "Author";

    fn id(&self) -> Id {
        self.id
    }
}

/// Author create/update form
#[derive(Debug, Default, Validate)]
pub struct AuthorForm {
    #[validate(
        length(min = 1, message = "First name must be specified."),
        custom(function = "first_name_chars")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        custom(function = "family_name_chars")
    )]
    pub family_name: String,
    #[validate(custom(function = "birth_date"))]
    pub date_of_birth: Option<String>,
    #[validate(custom(function = "death_date"))]
    pub date_of_death: Option<String>,
}

fn first_name_chars(value: &str) -> Result<(), ValidationError> {
    if is_alphanumeric(value) {
        Ok(())
    } else {
        Err(rule_error(
            "alphanumeric",
            "First name has non-alphanumeric characters.",
        ))
    }
}

fn family_name_chars(value: &str) -> Result<(), ValidationError> {
    if is_alphanumeric(value) {
        Ok(())
    } else {
        Err(rule_error(
            "alphanumeric",
            "Family name has non-alphanumeric characters.",
        ))
    }
}

fn birth_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| rule_error("iso8601", "Invalid date of birth"))
}

fn death_date(value: &str) -> Result<(), ValidationError> {
    parse_date(value)
        .map(|_| ())
        .ok_or_else(|| rule_error("iso8601", "Invalid date of death"))
}

impl EntityForm for AuthorForm {
    type Entity = Author;

    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn normalize(raw: &RawInput) -> Self {
        Self {
            first_name: raw.text("first_name"),
            family_name: raw.text("family_name"),
            date_of_birth: raw.optional("date_of_birth"),
            date_of_death: raw.optional("date_of_death"),
        }
    }

    fn into_candidate(self, id: Id) -> Author {
        Author {
            id,
            first_name: self.first_name,
            family_name: self.family_name,
            date_of_birth: self.date_of_birth.as_deref().and_then(parse_date),
            date_of_death: self.date_of_death.as_deref().and_then(parse_date),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::field_errors;

    fn submit(pairs: &[(&str, &str)]) -> (Author, Vec<String>) {
        let raw: RawInput = pairs.iter().copied().collect();
        let form = AuthorForm::normalize(&raw);
        let errors = field_errors(form.validate(), AuthorForm::FIELDS)
            .into_iter()
            .map(|e| e.message)
            .collect();
        (form.into_candidate(Id::new()), errors)
    }

    #[test]
    fn test_valid_author() {
        let (author, errors) = submit(&[
            ("first_name", "Isaac"),
            ("family_name", "Asimov"),
            ("date_of_birth", "1920-01-02"),
            ("date_of_death", ""),
        ]);
        assert!(errors.is_empty());
        assert_eq!(author.name(), "Asimov, Isaac");
        assert_eq!(author.date_of_birth, NaiveDate::from_ymd_opt(1920, 1, 2));
        assert_eq!(author.date_of_death, None);
        assert_eq!(author.lifespan(), "Jan 2, 1920 - ");
    }

    #[test]
    fn test_missing_names() {
        let (author, errors) = submit(&[("first_name", "   "), ("family_name", "Asimov")]);
        assert_eq!(errors, vec!["First name must be specified."]);
        assert_eq!(author.family_name, "Asimov");
        assert_eq!(author.name(), "");
    }

    #[test]
    fn test_non_alphanumeric_name() {
        let (_, errors) = submit(&[("first_name", "Ursula K."), ("family_name", "Le Guin")]);
        assert_eq!(
            errors,
            vec![
                "First name has non-alphanumeric characters.",
                "Family name has non-alphanumeric characters.",
            ]
        );
    }

    #[test]
    fn test_invalid_dates() {
        let (author, errors) = submit(&[
            ("first_name", "Isaac"),
            ("family_name", "Asimov"),
            ("date_of_birth", "yesterday"),
            ("date_of_death", "1992-04-06"),
        ]);
        assert_eq!(errors, vec!["Invalid date of birth"]);
        assert_eq!(author.date_of_birth, None);
        assert_eq!(author.date_of_death_iso(), "1992-04-06");
    }
}
