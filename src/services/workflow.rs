//! Create, update and delete workflow shared by every entity type
//!
//! A submission goes through three stages: normalize the raw input, validate
//! it and build a candidate entity, then process the candidate. Failed
//! validation and blocked deletions redisplay a page; only store faults and
//! unknown ids on detail/update lookups surface as errors.

use async_trait::async_trait;

use crate::{
    error::{AppError, AppResult},
    models::{form::field_errors, Book, Document, EntityForm, FieldError, Id, RawInput},
    repository::EntityStore,
    views::{Page, View},
};

/// Whether a form creates a new document or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

impl FormMode {
    pub fn title(&self, kind: &str) -> String {
        match self {
            FormMode::Create => format!("Create {}", kind),
            FormMode::Update => format!("Update {}", kind),
        }
    }
}

/// Result of the normalize and validate stages
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<E> {
    Accepted(E),
    Rejected { candidate: E, errors: Vec<FieldError> },
}

/// Run the normalize and validate stages.
///
/// The candidate is built whether or not the input is valid. `cross_field`
/// adds rules that look at the candidate as a whole; its errors are dropped
/// for fields that already failed a declarative rule.
pub fn submit<F: EntityForm>(
    raw: &RawInput,
    id: Id,
    cross_field: impl FnOnce(&F::Entity) -> Vec<FieldError>,
) -> Submission<F::Entity> {
    let form = F::normalize(raw);
    let mut errors = field_errors(form.validate(), F::FIELDS);
    let candidate = form.into_candidate(id);

    for error in cross_field(&candidate) {
        if !errors.iter().any(|e| e.field == error.field) {
            errors.push(error);
        }
    }

    if errors.is_empty() {
        Submission::Accepted(candidate)
    } else {
        Submission::Rejected { candidate, errors }
    }
}

/// One entity type's hooks into the workflow
#[async_trait]
pub trait Resource: Send + Sync {
    type Entity: Document;
    type Form: EntityForm<Entity = Self::Entity>;

    fn store(&self) -> &dyn EntityStore<Self::Entity>;

    /// The create/update form, filled from `candidate`
    async fn form_view(
        &self,
        mode: FormMode,
        candidate: Self::Entity,
        errors: Vec<FieldError>,
    ) -> AppResult<View>;

    /// An existing document that a valid candidate resolves to instead of being written
    async fn find_equivalent(&self, _candidate: &Self::Entity) -> AppResult<Option<Self::Entity>> {
        Ok(None)
    }

    /// Cross-field rules checked on update only
    fn update_rules(&self, _candidate: &Self::Entity) -> Vec<FieldError> {
        Vec::new()
    }

    /// Books that still reference the document; deletion is refused while any exist
    async fn dependents(&self, _id: Id) -> AppResult<Vec<Book>> {
        Ok(Vec::new())
    }

    /// The delete confirmation page
    async fn delete_view(&self, entity: Self::Entity, dependents: Vec<Book>) -> AppResult<View>;
}

pub(crate) fn not_found<T: Document>() -> AppError {
    AppError::NotFound(format!("{} not found", T::KIND))
}

/// Look a document up by its raw path id. Malformed ids find nothing.
pub async fn find_document<T: Document>(
    store: &dyn EntityStore<T>,
    raw_id: &str,
) -> AppResult<Option<T>> {
    match Id::parse(raw_id) {
        Some(id) => store.find_by_id(id).await,
        None => Ok(None),
    }
}

/// Like [`find_document`], but a missing document is a `NotFound` error
pub async fn require_document<T: Document>(
    store: &dyn EntityStore<T>,
    raw_id: &str,
) -> AppResult<T> {
    find_document(store, raw_id)
        .await?
        .ok_or_else(not_found::<T>)
}

/// GET create: an empty form
pub async fn create_form<R: Resource>(resource: &R) -> AppResult<Page> {
    let view = resource
        .form_view(FormMode::Create, R::Entity::default(), Vec::new())
        .await?;
    Ok(view.into())
}

/// POST create
pub async fn create<R: Resource>(resource: &R, raw: &RawInput) -> AppResult<Page> {
    let candidate = match submit::<R::Form>(raw, Id::new(), |_| Vec::new()) {
        Submission::Accepted(candidate) => candidate,
        Submission::Rejected { candidate, errors } => {
            tracing::debug!(
                "{} create rejected with {} field error(s)",
                R::Entity::KIND,
                errors.len()
            );
            let view = resource
                .form_view(FormMode::Create, candidate, errors)
                .await?;
            return Ok(view.into());
        }
    };

    if let Some(existing) = resource.find_equivalent(&candidate).await? {
        tracing::info!(
            "{} already exists as {}, not creating",
            R::Entity::KIND,
            existing.id()
        );
        return Ok(Page::redirect(existing.url()));
    }

    match resource.store().insert(candidate.clone()).await {
        Ok(created) => {
            tracing::info!("Created {} {}", R::Entity::KIND, created.id());
            Ok(Page::redirect(created.url()))
        }
        Err(AppError::Conflict(message)) => resolve_conflict(resource, &candidate, message).await,
        Err(e) => Err(e),
    }
}

/// GET update: the form filled from the stored document
pub async fn update_form<R: Resource>(resource: &R, raw_id: &str) -> AppResult<Page> {
    let entity = require_document(resource.store(), raw_id).await?;
    let view = resource
        .form_view(FormMode::Update, entity, Vec::new())
        .await?;
    Ok(view.into())
}

/// POST update. The path id is kept as the candidate's identity.
pub async fn update<R: Resource>(resource: &R, raw_id: &str, raw: &RawInput) -> AppResult<Page> {
    let id = Id::parse(raw_id).ok_or_else(not_found::<R::Entity>)?;

    let candidate = match submit::<R::Form>(raw, id, |c| resource.update_rules(c)) {
        Submission::Accepted(candidate) => candidate,
        Submission::Rejected { candidate, errors } => {
            tracing::debug!(
                "{} {} update rejected with {} field error(s)",
                R::Entity::KIND,
                id,
                errors.len()
            );
            let view = resource
                .form_view(FormMode::Update, candidate, errors)
                .await?;
            return Ok(view.into());
        }
    };

    if let Some(existing) = resource.find_equivalent(&candidate).await? {
        if existing.id() != id {
            tracing::info!(
                "{} {} matches existing {}, not updating",
                R::Entity::KIND,
                id,
                existing.id()
            );
            return Ok(Page::redirect(existing.url()));
        }
    }

    match resource.store().update_by_id(id, candidate.clone()).await {
        Ok(updated) => {
            tracing::info!("Updated {} {}", R::Entity::KIND, id);
            Ok(Page::redirect(updated.url()))
        }
        Err(AppError::Conflict(message)) => resolve_conflict(resource, &candidate, message).await,
        Err(e) => Err(e),
    }
}

/// A uniqueness conflict from the store means another request wrote the
/// same document between our check and our write: send the user to it.
async fn resolve_conflict<R: Resource>(
    resource: &R,
    candidate: &R::Entity,
    message: String,
) -> AppResult<Page> {
    match resource.find_equivalent(candidate).await? {
        Some(existing) => {
            tracing::warn!(
                "{} write conflicted, redirecting to existing {}",
                R::Entity::KIND,
                existing.id()
            );
            Ok(Page::redirect(existing.url()))
        }
        None => Err(AppError::Conflict(message)),
    }
}

/// GET delete: confirmation page, or back to the list if the document is gone
pub async fn delete_form<R: Resource>(resource: &R, raw_id: &str) -> AppResult<Page> {
    let Some(entity) = find_document(resource.store(), raw_id).await? else {
        return Ok(Page::redirect(R::Entity::list_url()));
    };
    let dependents = resource.dependents(entity.id()).await?;
    let view = resource.delete_view(entity, dependents).await?;
    Ok(view.into())
}

/// POST delete. Dependents are re-read here, never taken from the client.
pub async fn delete<R: Resource>(resource: &R, raw_id: &str) -> AppResult<Page> {
    let Some(entity) = find_document(resource.store(), raw_id).await? else {
        return Ok(Page::redirect(R::Entity::list_url()));
    };
    let id = entity.id();

    let dependents = resource.dependents(id).await?;
    if !dependents.is_empty() {
        tracing::debug!(
            "{} {} still referenced by {} book(s), not deleting",
            R::Entity::KIND,
            id,
            dependents.len()
        );
        let view = resource.delete_view(entity, dependents).await?;
        return Ok(view.into());
    }

    resource.store().delete_by_id(id).await?;
    tracing::info!("Deleted {} {}", R::Entity::KIND, id);
    Ok(Page::redirect(R::Entity::list_url()))
}
