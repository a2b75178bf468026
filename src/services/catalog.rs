//! Catalog home page

use crate::{
    error::AppResult,
    models::InstanceStatus,
    repository::{Filter, Repository},
    views::{IndexTemplate, View},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Document counts shown on the home page
    pub async fn index(&self) -> AppResult<View> {
        let book_count = self.repository.books.count(Filter::All).await?;
        let book_instance_count = self.repository.book_instances.count(Filter::All).await?;
        let book_instance_available_count = self
            .repository
            .book_instances
            .count(Filter::eq("status", InstanceStatus::Available.as_str()))
            .await?;
        let author_count = self.repository.authors.count(Filter::All).await?;
        let genre_count = self.repository.genres.count(Filter::All).await?;

        Ok(View::Index(IndexTemplate {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        }))
    }
}
