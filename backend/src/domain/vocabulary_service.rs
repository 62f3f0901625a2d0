//! Vocabulary use-cases: list, fetch, create, update, delete.
//!
//! Create runs the validate → duplicate-probe → write sequence; the probe
//! compares the canonical (lower-cased) key produced by validation, so
//! `Climate`/`RW` and `climate`/`rw` collide as required.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::error::{TaggingError, TaggingResult};
use super::ports::{
    ResourceRepository, ResourceRepositoryError, VocabularyRepository, VocabularyRepositoryError,
};
use super::validation::validate_vocabulary;
use super::vocabulary::{Vocabulary, VocabularyCandidate, VocabularyStatus};

fn map_vocabulary_error(error: VocabularyRepositoryError) -> TaggingError {
    TaggingError::ResourceUpdateFailed(error.to_string())
}

fn map_resource_error(error: ResourceRepositoryError) -> TaggingError {
    TaggingError::ResourceUpdateFailed(error.to_string())
}

/// Vocabulary service backed by the document-store ports.
#[derive(Clone)]
pub struct VocabularyService {
    vocabularies: Arc<dyn VocabularyRepository>,
    resources: Arc<dyn ResourceRepository>,
}

impl VocabularyService {
    /// Create a new service over the given repositories.
    pub fn new(
        vocabularies: Arc<dyn VocabularyRepository>,
        resources: Arc<dyn ResourceRepository>,
    ) -> Self {
        Self {
            vocabularies,
            resources,
        }
    }

    /// List vocabularies, optionally restricted to one application.
    ///
    /// # Errors
    ///
    /// Propagates store failures as [`TaggingError::ResourceUpdateFailed`].
    pub async fn list(&self, application: Option<&str>) -> TaggingResult<Vec<Vocabulary>> {
        let application = application.map(str::to_lowercase);
        self.vocabularies
            .find(application.as_deref())
            .await
            .map_err(map_vocabulary_error)
    }

    /// Fetch one vocabulary by canonical key.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::VocabularyNotFound`] when no vocabulary
    /// matches `(name, application)`.
    pub async fn get(&self, name: &str, application: &str) -> TaggingResult<Vocabulary> {
        let name = name.to_lowercase();
        let application = application.to_lowercase();
        self.vocabularies
            .find_one(&name, &application)
            .await
            .map_err(map_vocabulary_error)?
            .ok_or(TaggingError::VocabularyNotFound(name))
    }

    /// Validate, probe for duplicates, and persist a new vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::VocabularyNotValid`] on field failures and
    /// [`TaggingError::VocabularyDuplicated`] when the canonical key already
    /// exists.
    pub async fn create(&self, candidate: VocabularyCandidate) -> TaggingResult<Vocabulary> {
        let valid = validate_vocabulary(candidate)?;
        let existing = self
            .vocabularies
            .find_one(&valid.name, &valid.application)
            .await
            .map_err(map_vocabulary_error)?;
        if existing.is_some() {
            return Err(TaggingError::VocabularyDuplicated(valid.name));
        }

        debug!(name = %valid.name, application = %valid.application, "creating vocabulary");
        let vocabulary = Vocabulary::new(valid.name, valid.application, valid.status, Utc::now());
        self.vocabularies
            .save(&vocabulary)
            .await
            .map_err(map_vocabulary_error)?;
        Ok(vocabulary)
    }

    /// Update the lifecycle status of an existing vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::VocabularyNotFound`] when no vocabulary
    /// matches `(name, application)`.
    pub async fn update(
        &self,
        name: &str,
        application: &str,
        status: Option<VocabularyStatus>,
    ) -> TaggingResult<Vocabulary> {
        let mut vocabulary = self.get(name, application).await?;
        if let Some(status) = status {
            vocabulary.status = status;
        }
        vocabulary.updated_at = Utc::now();
        self.vocabularies
            .save(&vocabulary)
            .await
            .map_err(map_vocabulary_error)?;
        Ok(vocabulary)
    }

    /// Delete a vocabulary and detach it from every resource it references.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::VocabularyNotFound`] when the vocabulary does
    /// not exist, and [`TaggingError::ConsistencyViolation`] when one of its
    /// resource attachments has no mirror on the resource side.
    pub async fn delete(&self, name: &str, application: &str) -> TaggingResult<Vocabulary> {
        let vocabulary = self.get(name, application).await?;

        for attached in &vocabulary.resources {
            let mut resource = self
                .resources
                .find_one(attached.resource_type, &attached.id)
                .await
                .map_err(map_resource_error)?
                .ok_or_else(|| {
                    TaggingError::ConsistencyViolation(format!(
                        "vocabulary {} references missing {} {}",
                        vocabulary.name, attached.resource_type, attached.id
                    ))
                })?;
            if !resource.detach_vocabulary(&vocabulary.name, &vocabulary.application) {
                return Err(TaggingError::ConsistencyViolation(format!(
                    "{} {} does not mirror vocabulary {}",
                    attached.resource_type, attached.id, vocabulary.name
                )));
            }
            // Drop resource documents left with no attachments.
            if resource.vocabularies.is_empty() {
                self.resources
                    .delete(attached.resource_type, &attached.id)
                    .await
                    .map_err(map_resource_error)?;
            } else {
                self.resources
                    .save(&resource)
                    .await
                    .map_err(map_resource_error)?;
            }
        }

        debug!(name = %vocabulary.name, application = %vocabulary.application, "deleting vocabulary");
        self.vocabularies
            .delete(&vocabulary.name, &vocabulary.application)
            .await
            .map_err(map_vocabulary_error)?;
        Ok(vocabulary)
    }
}
