//! Book copy pages

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        book_instance::due_back_required, Book, BookInstance, BookInstanceForm, FieldError, Id,
    },
    repository::{EntityStore, Filter, Query, Repository},
    views::{
        status_options, BookInstanceDeleteTemplate, BookInstanceDetailTemplate,
        BookInstanceFormTemplate, BookInstanceListTemplate, InstanceRow, SelectOption, View,
    },
};

use super::workflow::{require_document, FormMode, Resource};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All copies, each with the book it is a copy of
    pub async fn list(&self) -> AppResult<View> {
        let instances = self.repository.book_instances.find(Query::all()).await?;

        let ids: Vec<Id> = instances.iter().map(|i| i.book).collect();
        let books: HashMap<Id, Book> = self
            .repository
            .books
            .find(Query::filter(Filter::IdIn(ids)))
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        let instances = instances
            .into_iter()
            .map(|instance| InstanceRow {
                book: books.get(&instance.book).cloned(),
                instance,
            })
            .collect();
        Ok(View::BookInstanceList(BookInstanceListTemplate { instances }))
    }

    pub async fn detail(&self, raw_id: &str) -> AppResult<View> {
        let instance = require_document(self.repository.book_instances.as_ref(), raw_id).await?;
        let book = self.repository.books.find_by_id(instance.book).await?;
        Ok(View::BookInstanceDetail(BookInstanceDetailTemplate {
            instance,
            book,
        }))
    }
}

#[async_trait]
impl Resource for BookInstancesService {
    type Entity = BookInstance;
    type Form = BookInstanceForm;

    fn store(&self) -> &dyn EntityStore<BookInstance> {
        self.repository.book_instances.as_ref()
    }

    async fn form_view(
        &self,
        mode: FormMode,
        candidate: BookInstance,
        errors: Vec<FieldError>,
    ) -> AppResult<View> {
        let books = self
            .repository
            .books
            .find(Query::all().sort_by("title"))
            .await?
            .into_iter()
            .map(|b| SelectOption::new(b.id, b.title, b.id == candidate.book))
            .collect();

        Ok(View::BookInstanceForm(BookInstanceFormTemplate {
            title: mode.title("BookInstance"),
            statuses: status_options(candidate.status),
            books,
            instance: candidate,
            errors,
        }))
    }

    fn update_rules(&self, candidate: &BookInstance) -> Vec<FieldError> {
        due_back_required(candidate).into_iter().collect()
    }

    async fn delete_view(&self, instance: BookInstance, _dependents: Vec<Book>) -> AppResult<View> {
        let book = self.repository.books.find_by_id(instance.book).await?;
        Ok(View::BookInstanceDelete(BookInstanceDeleteTemplate {
            instance,
            book,
        }))
    }
}
