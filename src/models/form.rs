//! Form input normalization and field-level validation errors

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use super::{Document, Id};

/// One failed field rule, shown next to the redisplayed form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A raw form field as submitted: missing, given once, or repeated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Absent,
    Scalar(String),
    List(Vec<String>),
}

/// Coerce a raw field into a list of zero or more values
pub fn to_list(value: RawValue) -> Vec<String> {
    match value {
        RawValue::Absent => Vec::new(),
        RawValue::Scalar(v) => vec![v],
        RawValue::List(values) => values,
    }
}

/// Urlencoded request body, kept as ordered pairs so repeated keys survive
#[derive(Debug, Clone, Default)]
pub struct RawInput(Vec<(String, String)>);

impl RawInput {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// All occurrences of `name`
    pub fn value(&self, name: &str) -> RawValue {
        let mut values: Vec<String> = self
            .0
            .iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
            .collect();
        match values.len() {
            0 => RawValue::Absent,
            1 => RawValue::Scalar(values.remove(0)),
            _ => RawValue::List(values),
        }
    }

    /// Trimmed single value; empty when the field is missing
    pub fn text(&self, name: &str) -> String {
        match self.value(name) {
            RawValue::Absent => String::new(),
            RawValue::Scalar(v) => v.trim().to_string(),
            RawValue::List(values) => values
                .first()
                .map(|v| v.trim().to_string())
                .unwrap_or_default(),
        }
    }

    /// Trimmed single value, `None` when missing or blank
    pub fn optional(&self, name: &str) -> Option<String> {
        let text = self.text(name);
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Trimmed values of a multi-valued field
    pub fn list(&self, name: &str) -> Vec<String> {
        to_list(self.value(name))
            .into_iter()
            .map(|v| v.trim().to_string())
            .collect()
    }
}

impl From<Vec<(String, String)>> for RawInput {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::new(pairs)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A submitted form for one entity type.
///
/// `normalize` reshapes raw input (trim, list coercion, blank → absent),
/// `validate` runs the declarative field rules, and `into_candidate` builds
/// the entity regardless of whether validation passed.
pub trait EntityForm: Validate + Sized {
    type Entity: Document;

    /// Field order used when listing errors
    const FIELDS: &'static [&'static str];

    fn normalize(raw: &RawInput) -> Self;

    fn into_candidate(self, id: Id) -> Self::Entity;
}

/// Flatten validator output into field errors, ordered like the form
pub fn field_errors(result: Result<(), ValidationErrors>, order: &[&str]) -> Vec<FieldError> {
    let Err(errors) = result else {
        return Vec::new();
    };

    let mut flat: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();

    flat.sort_by_key(|e| {
        order
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(order.len())
    });
    flat
}

/// Build a validation error carrying its display message
pub(crate) fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// ISO-8601 calendar date (`yyyy-mm-dd`)
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Letters and digits only, as ASCII. Blank input is left to the length rule.
pub(crate) fn is_alphanumeric(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_alphanumeric())
}
