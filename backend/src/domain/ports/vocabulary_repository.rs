//! Port for vocabulary document persistence.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::vocabulary::Vocabulary;

/// Errors raised by vocabulary repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyRepositoryError {
    /// Store connection could not be established.
    #[error("vocabulary store connection failed: {0}")]
    Connection(String),
    /// Query or mutation failed during execution.
    #[error("vocabulary store query failed: {0}")]
    Query(String),
}

/// Port for vocabulary document storage.
///
/// Vocabularies are keyed by `(name, application)`; `find_one` is the probe
/// the duplicate checker relies on, so callers must pass canonical
/// (lower-cased) keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VocabularyRepository: Send + Sync {
    /// Fetch the vocabulary for `(name, application)`, if present.
    async fn find_one(
        &self,
        name: &str,
        application: &str,
    ) -> Result<Option<Vocabulary>, VocabularyRepositoryError>;

    /// Fetch vocabularies, optionally restricted to one application.
    async fn find<'a>(
        &self,
        application: Option<&'a str>,
    ) -> Result<Vec<Vocabulary>, VocabularyRepositoryError>;

    /// Upsert a vocabulary document keyed by `(name, application)`.
    async fn save(&self, vocabulary: &Vocabulary) -> Result<(), VocabularyRepositoryError>;

    /// Delete the vocabulary for `(name, application)`.
    async fn delete(&self, name: &str, application: &str)
    -> Result<(), VocabularyRepositoryError>;
}
