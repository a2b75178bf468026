//! Repository layer: one document collection per entity type

pub mod documents;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, Document, Genre, Id},
};

pub use documents::PgStore;
pub use memory::MemoryStore;

/// Document selector
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Top-level field equals the value
    Eq(&'static str, Value),
    /// Top-level array field contains the value
    Contains(&'static str, Value),
    /// Document id is one of the given ids
    IdIn(Vec<Id>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn contains(field: &'static str, value: impl Into<Value>) -> Self {
        Filter::Contains(field, value.into())
    }
}

/// A filter plus an optional ascending sort key
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<&'static str>,
}

impl Query {
    pub fn all() -> Self {
        Self::filter(Filter::All)
    }

    pub fn filter(filter: Filter) -> Self {
        Self { filter, sort: None }
    }

    pub fn sort_by(mut self, field: &'static str) -> Self {
        self.sort = Some(field);
        self
    }
}

/// Capabilities the controllers need from a document collection.
///
/// `update_by_id` and `delete_by_id` fail with `NotFound` for unknown ids.
/// Writes that break a uniqueness constraint fail with `Conflict`.
#[async_trait]
pub trait EntityStore<T: Document>: Send + Sync {
    async fn find_by_id(&self, id: Id) -> AppResult<Option<T>>;

    async fn find(&self, query: Query) -> AppResult<Vec<T>>;

    async fn find_one(&self, filter: Filter) -> AppResult<Option<T>> {
        Ok(self.find(Query::filter(filter)).await?.into_iter().next())
    }

    async fn count(&self, filter: Filter) -> AppResult<i64>;

    async fn insert(&self, doc: T) -> AppResult<T>;

    async fn update_by_id(&self, id: Id, doc: T) -> AppResult<T>;

    async fn delete_by_id(&self, id: Id) -> AppResult<()>;
}

/// Main repository struct holding one store per collection
#[derive(Clone)]
pub struct Repository {
    pub authors: Arc<dyn EntityStore<Author>>,
    pub books: Arc<dyn EntityStore<Book>>,
    pub genres: Arc<dyn EntityStore<Genre>>,
    pub book_instances: Arc<dyn EntityStore<BookInstance>>,
}

impl Repository {
    /// Create a new repository backed by PostgreSQL JSONB collections
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: Arc::new(PgStore::<Author>::new(pool.clone())),
            books: Arc::new(PgStore::<Book>::new(pool.clone())),
            genres: Arc::new(PgStore::<Genre>::new(pool.clone())),
            book_instances: Arc::new(PgStore::<BookInstance>::new(pool)),
        }
    }

    /// Create a non-persistent repository
    pub fn in_memory() -> Self {
        Self {
            authors: Arc::new(MemoryStore::<Author>::new()),
            books: Arc::new(MemoryStore::<Book>::new()),
            genres: Arc::new(MemoryStore::<Genre>::new().with_unique("name")),
            book_instances: Arc::new(MemoryStore::<BookInstance>::new()),
        }
    }

    /// Cheap round trip used by the readiness check
    pub async fn ping(&self) -> AppResult<()> {
        self.genres.count(Filter::All).await.map(|_| ())
    }
}
