use std::{future::Future, sync::Arc};

use thiserror::Error;

use crate::{
    consts::consts::{DocumentId, DNI_FIELD},
    model::{person::Person, update::UpdatePersonData},
    persistence::storage::{
        filter::Filter, DeleteResult, DocumentStore, StorageResult, StoreError, UpdateResult,
    },
};

use super::options::RepositoryOptions;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Not found, no person with dni: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Typed access to the `people` collection.
///
/// Translates person level intents into store calls and store results back into person level
/// outcomes:
/// 1. Every lookup except creation goes through the `dni` natural key. The store does not
///    enforce its uniqueness, so a lookup is "first match of possibly many".
/// 2. Every store call is a single attempt bounded by `RepositoryOptions::timeout`.
/// 3. Failures are returned, never logged or retried. Deciding what a failure means to a
///    caller is left to the caller.
pub struct PersonRepository {
    store: Arc<dyn DocumentStore>,
    options: RepositoryOptions,
}

impl PersonRepository {
    pub fn new(store: Arc<dyn DocumentStore>, options: RepositoryOptions) -> Self {
        Self { store, options }
    }

    fn dni_filter(dni: &str) -> Filter {
        Filter::all().eq(DNI_FIELD, dni)
    }

    /// Dropping the store future on expiry cancels the call
    async fn with_deadline<T>(&self, call: impl Future<Output = StorageResult<T>>) -> StorageResult<T> {
        match tokio::time::timeout(self.options.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.options.timeout)),
        }
    }

    /// Every stored person. Fail fast: one undecodable document fails the whole listing.
    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self) -> RepositoryResult<Vec<Person>> {
        let documents = self.with_deadline(self.store.find(&Filter::all())).await?;

        let people = documents
            .into_iter()
            .map(Person::from_document)
            .collect::<StorageResult<Vec<Person>>>()?;

        Ok(people)
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_dni(&self, dni: &str) -> RepositoryResult<Person> {
        let filter = Self::dni_filter(dni);

        match self.with_deadline(self.store.find_one(&filter)).await? {
            Some(document) => Ok(Person::from_document(document)?),
            None => Err(RepositoryError::NotFound(dni.to_string())),
        }
    }

    /// Stores a new person and returns the id the store assigned. A caller supplied id is
    /// ignored.
    #[tracing::instrument(skip(self, person), fields(dni = %person.dni))]
    pub async fn create(&self, person: Person) -> RepositoryResult<DocumentId> {
        let document = person.to_document()?;

        let id = self.with_deadline(self.store.insert_one(document)).await?;

        Ok(id)
    }

    /// Merges the non-empty fields of `patch` onto the first person with `dni`.
    ///
    /// No match is not an error, it is reported as zero counts. A patch without a single
    /// non-empty field writes nothing and only reports whether `dni` matched.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, dni: &str, patch: Person) -> RepositoryResult<UpdateResult> {
        let filter = Self::dni_filter(dni);
        let update = UpdatePersonData::from_patch(patch);

        if !update.has_changes() {
            let existing = self.with_deadline(self.store.find_one(&filter)).await?;

            return Ok(UpdateResult {
                matched_count: existing.is_some() as u64,
                modified_count: 0,
            });
        }

        let set = update.to_set_document()?;

        let result = self
            .with_deadline(self.store.update_one(&filter, set))
            .await?;

        Ok(result)
    }

    /// Deleting a missing dni is not an error, it is a zero count
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_dni(&self, dni: &str) -> RepositoryResult<DeleteResult> {
        let filter = Self::dni_filter(dni);

        let result = self.with_deadline(self.store.delete_one(&filter)).await?;

        Ok(result)
    }
}
