//! In-memory document collections
//!
//! Evaluates the same `Filter` / `Query` values as the Postgres store against
//! each document's JSON form. Used by the tests and the `memory` backend.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{Document, Id},
};

use super::{EntityStore, Filter, Query};

pub struct MemoryStore<T> {
    docs: RwLock<Vec<T>>,
    unique: Option<&'static str>,
}

impl<T: Document> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            unique: None,
        }
    }

    /// Reject writes that would give two documents the same value for `field`
    pub fn with_unique(mut self, field: &'static str) -> Self {
        self.unique = Some(field);
        self
    }

    fn check_unique(&self, docs: &[T], candidate: &T) -> AppResult<()> {
        let Some(field) = self.unique else {
            return Ok(());
        };
        let value = serde_json::to_value(candidate)?;
        let Some(expected) = value.get(field) else {
            return Ok(());
        };
        for doc in docs.iter().filter(|d| d.id() != candidate.id()) {
            if serde_json::to_value(doc)?.get(field) == Some(expected) {
                return Err(AppError::Conflict(format!("{} already exists", T::KIND)));
            }
        }
        Ok(())
    }
}

impl<T: Document> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(filter: &Filter, doc: &Value) -> bool {
    match filter {
        Filter::All => true,
        Filter::Eq(field, value) => doc.get(*field) == Some(value),
        Filter::Contains(field, value) => doc
            .get(*field)
            .and_then(Value::as_array)
            .map_or(false, |items| items.contains(value)),
        Filter::IdIn(ids) => doc
            .get("id")
            .and_then(Value::as_str)
            .and_then(Id::parse)
            .map_or(false, |id| ids.contains(&id)),
    }
}

/// Ascending order on string fields; missing values sort first
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_str), b.and_then(Value::as_str)) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl<T: Document> EntityStore<T> for MemoryStore<T> {
    async fn find_by_id(&self, id: Id) -> AppResult<Option<T>> {
        let docs = self.docs.read().await;
        Ok(docs.iter().find(|d| d.id() == id).cloned())
    }

    async fn find(&self, query: Query) -> AppResult<Vec<T>> {
        let docs = self.docs.read().await;
        let mut selected = Vec::new();
        for doc in docs.iter() {
            let value = serde_json::to_value(doc)?;
            if matches(&query.filter, &value) {
                selected.push((value, doc.clone()));
            }
        }

        if let Some(field) = query.sort {
            // Stable, so equal keys keep insertion order
            selected.sort_by(|(a, _), (b, _)| compare(a.get(field), b.get(field)));
        }
        Ok(selected.into_iter().map(|(_, doc)| doc).collect())
    }

    async fn count(&self, filter: Filter) -> AppResult<i64> {
        let docs = self.docs.read().await;
        let mut count = 0;
        for doc in docs.iter() {
            if matches(&filter, &serde_json::to_value(doc)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn insert(&self, doc: T) -> AppResult<T> {
        let mut docs = self.docs.write().await;
        if docs.iter().any(|d| d.id() == doc.id()) {
            return Err(AppError::Conflict(format!(
                "{} {} already exists",
                T::KIND,
                doc.id()
            )));
        }
        self.check_unique(&docs, &doc)?;
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update_by_id(&self, id: Id, doc: T) -> AppResult<T> {
        let mut docs = self.docs.write().await;
        let Some(position) = docs.iter().position(|d| d.id() == id) else {
            return Err(AppError::NotFound(format!("{} {} not found", T::KIND, id)));
        };
        self.check_unique(&docs, &doc)?;
        docs[position] = doc.clone();
        Ok(doc)
    }

    async fn delete_by_id(&self, id: Id) -> AppResult<()> {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        if docs.len() == before {
            return Err(AppError::NotFound(format!("{} {} not found", T::KIND, id)));
        }
        Ok(())
    }
}
