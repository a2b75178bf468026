//! PostgreSQL JSONB document collections
//!
//! Each collection is a table `(id UUID PRIMARY KEY, doc JSONB NOT NULL)`.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{Document, Id},
};

use super::{EntityStore, Filter, Query};

pub struct PgStore<T> {
    pool: Pool<Postgres>,
    _doc: PhantomData<T>,
}

impl<T: Document> PgStore<T> {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            _doc: PhantomData,
        }
    }

    fn not_found(id: Id) -> AppError {
        AppError::NotFound(format!("{} {} not found", T::KIND, id))
    }
}

/// Append a WHERE clause for `filter`
fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    match filter {
        Filter::All => {}
        Filter::Eq(field, value) => {
            qb.push(" WHERE doc -> ")
                .push_bind(*field)
                .push(" = ")
                .push_bind(Json(value.clone()));
        }
        Filter::Contains(field, value) => {
            qb.push(" WHERE doc -> ")
                .push_bind(*field)
                .push(" @> ")
                .push_bind(Json(Value::Array(vec![value.clone()])));
        }
        Filter::IdIn(ids) => {
            let ids: Vec<uuid::Uuid> = ids.iter().map(Id::as_uuid).collect();
            qb.push(" WHERE id = ANY(").push_bind(ids).push(")");
        }
    }
}

/// Unique index violations become `Conflict`, everything else stays a database error
fn write_error<T: Document>(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("{} already exists", T::KIND))
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl<T: Document> EntityStore<T> for PgStore<T> {
    async fn find_by_id(&self, id: Id) -> AppResult<Option<T>> {
        let doc = sqlx::query_scalar::<_, Json<T>>(&format!(
            "SELECT doc FROM {} WHERE id = $1",
            T::COLLECTION
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(doc.map(|Json(doc)| doc))
    }

    async fn find(&self, query: Query) -> AppResult<Vec<T>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT doc FROM {}", T::COLLECTION));
        push_filter(&mut qb, &query.filter);
        if let Some(field) = query.sort {
            // Byte order, matching the in-memory store
            qb.push(" ORDER BY (doc ->> ").push_bind(field).push(") COLLATE \"C\"");
        }

        let rows = qb
            .build_query_scalar::<Json<T>>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(doc)| doc).collect())
    }

    async fn count(&self, filter: Filter) -> AppResult<i64> {
        let mut qb =
            QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*)::bigint FROM {}", T::COLLECTION));
        push_filter(&mut qb, &filter);

        let count = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn insert(&self, doc: T) -> AppResult<T> {
        let Json(created) = sqlx::query_scalar::<_, Json<T>>(&format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING doc",
            T::COLLECTION
        ))
        .bind(doc.id().as_uuid())
        .bind(Json(&doc))
        .fetch_one(&self.pool)
        .await
        .map_err(write_error::<T>)?;
        Ok(created)
    }

    async fn update_by_id(&self, id: Id, doc: T) -> AppResult<T> {
        let updated = sqlx::query_scalar::<_, Json<T>>(&format!(
            "UPDATE {} SET doc = $2 WHERE id = $1 RETURNING doc",
            T::COLLECTION
        ))
        .bind(id.as_uuid())
        .bind(Json(&doc))
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error::<T>)?;

        updated
            .map(|Json(doc)| doc)
            .ok_or_else(|| Self::not_found(id))
    }

    async fn delete_by_id(&self, id: Id) -> AppResult<()> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::COLLECTION))
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Self::not_found(id));
        }
        Ok(())
    }
}
