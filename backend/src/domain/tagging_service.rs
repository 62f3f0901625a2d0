//! Relationship use-cases: associate vocabularies and tags with resources.
//!
//! Every write keeps the two sides of a relationship mirrored: the resource
//! document carries a `VocabularyTag`, the vocabulary document carries a
//! `ResourceTag`. A write that finds only one side present raises
//! [`TaggingError::ConsistencyViolation`]. Successful associations are
//! mirrored into the graph database; graph failures are wrapped and
//! re-raised, never swallowed.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::debug;

use super::error::{TaggingError, TaggingResult};
use super::ports::{
    GraphService, GraphServiceError, ResourceRepository, ResourceRepositoryError,
    VocabularyRepository, VocabularyRepositoryError,
};
use super::resource::{CloneCandidate, RelationshipCandidate, Resource, ResourceRef, VocabularyTag};
use super::validation::{validate_clone, validate_relationship, validate_relationships};
use super::vocabulary::{ResourceTag, Vocabulary};

fn map_resource_error(error: ResourceRepositoryError) -> TaggingError {
    TaggingError::ResourceUpdateFailed(error.to_string())
}

fn map_vocabulary_error(error: VocabularyRepositoryError) -> TaggingError {
    TaggingError::ResourceUpdateFailed(error.to_string())
}

fn map_graph_error(error: GraphServiceError) -> TaggingError {
    TaggingError::ResourceUpdateFailed(format!("graph association failed: {error}"))
}

fn resource_tag_for(resource: &Resource, tags: Vec<String>) -> ResourceTag {
    ResourceTag {
        id: resource.id.clone(),
        dataset: resource.dataset.clone(),
        resource_type: resource.resource_type,
        tags,
    }
}

/// Tagging service coordinating resources, vocabularies, and the graph.
#[derive(Clone)]
pub struct TaggingService {
    resources: Arc<dyn ResourceRepository>,
    vocabularies: Arc<dyn VocabularyRepository>,
    graph: Arc<dyn GraphService>,
}

impl TaggingService {
    /// Create a new service over the given ports.
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        vocabularies: Arc<dyn VocabularyRepository>,
        graph: Arc<dyn GraphService>,
    ) -> Self {
        Self {
            resources,
            vocabularies,
            graph,
        }
    }

    /// Fetch a resource and its vocabulary attachments.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::ResourceNotFound`] when the resource has no
    /// document, i.e. nothing was ever tagged on it.
    pub async fn resource_vocabularies(&self, resource: &ResourceRef) -> TaggingResult<Resource> {
        self.resources
            .find_one(resource.resource_type, &resource.id)
            .await
            .map_err(map_resource_error)?
            .ok_or_else(|| TaggingError::ResourceNotFound(resource.id.clone()))
    }

    /// Associate a vocabulary and tags with a resource.
    ///
    /// The resource document is created on first association; the vocabulary
    /// must already exist (tagging draws from controlled vocabularies).
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::RelationshipNotValid`] on field failures,
    /// [`TaggingError::RelationshipDuplicated`] when the vocabulary is
    /// already attached, and [`TaggingError::VocabularyNotFound`] when the
    /// vocabulary does not exist.
    pub async fn create_relationship(
        &self,
        resource: &ResourceRef,
        vocabulary_name: &str,
        candidate: RelationshipCandidate,
    ) -> TaggingResult<Resource> {
        let valid = validate_relationship(&candidate)?;
        let name = vocabulary_name.to_lowercase();

        let mut doc = self
            .resources
            .find_one(resource.resource_type, &resource.id)
            .await
            .map_err(map_resource_error)?
            .unwrap_or_else(|| Resource::untagged(resource));

        if doc.vocabulary(&name, &valid.application).is_some() {
            return Err(TaggingError::RelationshipDuplicated(format!(
                "vocabulary {name} is already associated with {} {}",
                resource.resource_type, resource.id
            )));
        }

        let mut vocabulary = self
            .vocabularies
            .find_one(&name, &valid.application)
            .await
            .map_err(map_vocabulary_error)?
            .ok_or_else(|| TaggingError::VocabularyNotFound(name.clone()))?;

        if vocabulary.resource(resource).is_some() {
            return Err(TaggingError::ConsistencyViolation(format!(
                "vocabulary {name} already lists {} {} but the resource does not mirror it",
                resource.resource_type, resource.id
            )));
        }

        doc.vocabularies.push(VocabularyTag {
            name: name.clone(),
            application: valid.application.clone(),
            tags: valid.tags.clone(),
        });
        vocabulary
            .resources
            .push(resource_tag_for(&doc, valid.tags.clone()));
        vocabulary.updated_at = Utc::now();

        self.resources.save(&doc).await.map_err(map_resource_error)?;
        self.vocabularies
            .save(&vocabulary)
            .await
            .map_err(map_vocabulary_error)?;

        debug!(
            vocabulary = %name,
            resource = %resource.id,
            "mirroring association into the graph"
        );
        self.graph
            .associate(resource.resource_type, &resource.id, &valid.tags)
            .await
            .map_err(map_graph_error)?;

        Ok(doc)
    }

    /// Associate several vocabularies with a resource in one request.
    ///
    /// The body maps vocabulary names to `{application, tags}`; the reserved
    /// `loggedUser` key is skipped. Validation collects every failing key
    /// before reporting. Each association is then checked and applied as in
    /// [`Self::create_relationship`].
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::RelationshipsNotValid`] listing all failing
    /// keys, [`TaggingError::RelationshipDuplicated`] when any vocabulary is
    /// already attached, and [`TaggingError::VocabularyNotFound`] when one
    /// does not exist.
    pub async fn create_relationships(
        &self,
        resource: &ResourceRef,
        body: &Map<String, Value>,
    ) -> TaggingResult<Resource> {
        let relationships = validate_relationships(body)?;

        let mut doc = self
            .resources
            .find_one(resource.resource_type, &resource.id)
            .await
            .map_err(map_resource_error)?
            .unwrap_or_else(|| Resource::untagged(resource));

        let mut pending: Vec<(Vec<String>, Vocabulary)> = Vec::new();
        for (raw_name, valid) in relationships {
            let name = raw_name.to_lowercase();
            if doc.vocabulary(&name, &valid.application).is_some() {
                return Err(TaggingError::RelationshipDuplicated(format!(
                    "vocabulary {name} is already associated with {} {}",
                    resource.resource_type, resource.id
                )));
            }
            let mut vocabulary = self
                .vocabularies
                .find_one(&name, &valid.application)
                .await
                .map_err(map_vocabulary_error)?
                .ok_or_else(|| TaggingError::VocabularyNotFound(name.clone()))?;

            vocabulary
                .resources
                .push(resource_tag_for(&doc, valid.tags.clone()));
            vocabulary.updated_at = Utc::now();
            doc.vocabularies.push(VocabularyTag {
                name,
                application: valid.application,
                tags: valid.tags.clone(),
            });
            pending.push((valid.tags, vocabulary));
        }

        self.resources.save(&doc).await.map_err(map_resource_error)?;
        for (tags, vocabulary) in &pending {
            self.vocabularies
                .save(vocabulary)
                .await
                .map_err(map_vocabulary_error)?;
            self.graph
                .associate(resource.resource_type, &resource.id, tags)
                .await
                .map_err(map_graph_error)?;
        }

        Ok(doc)
    }

    /// Replace the tags of an existing relationship.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::ResourceNotFound`] /
    /// [`TaggingError::RelationshipNotFound`] /
    /// [`TaggingError::VocabularyNotFound`] for missing pieces, and
    /// [`TaggingError::ConsistencyViolation`] when the vocabulary does not
    /// mirror a relationship the resource carries.
    pub async fn update_relationship(
        &self,
        resource: &ResourceRef,
        vocabulary_name: &str,
        candidate: RelationshipCandidate,
    ) -> TaggingResult<Resource> {
        let valid = validate_relationship(&candidate)?;
        let name = vocabulary_name.to_lowercase();

        let mut doc = self
            .resources
            .find_one(resource.resource_type, &resource.id)
            .await
            .map_err(map_resource_error)?
            .ok_or_else(|| TaggingError::ResourceNotFound(resource.id.clone()))?;

        let attachment = doc
            .vocabularies
            .iter_mut()
            .find(|tag| tag.name == name && tag.application == valid.application)
            .ok_or_else(|| {
                TaggingError::RelationshipNotFound(format!(
                    "vocabulary {name} is not associated with {} {}",
                    resource.resource_type, resource.id
                ))
            })?;
        attachment.tags = valid.tags.clone();

        let mut vocabulary = self
            .vocabularies
            .find_one(&name, &valid.application)
            .await
            .map_err(map_vocabulary_error)?
            .ok_or_else(|| TaggingError::VocabularyNotFound(name.clone()))?;

        let mirrored = vocabulary
            .resources
            .iter_mut()
            .find(|tag| tag.id == resource.id && tag.resource_type == resource.resource_type)
            .ok_or_else(|| {
                TaggingError::ConsistencyViolation(format!(
                    "{} {} carries vocabulary {name} but the vocabulary does not list it",
                    resource.resource_type, resource.id
                ))
            })?;
        mirrored.tags = valid.tags.clone();
        vocabulary.updated_at = Utc::now();

        self.resources.save(&doc).await.map_err(map_resource_error)?;
        self.vocabularies
            .save(&vocabulary)
            .await
            .map_err(map_vocabulary_error)?;
        self.graph
            .associate(resource.resource_type, &resource.id, &valid.tags)
            .await
            .map_err(map_graph_error)?;

        Ok(doc)
    }

    /// Remove a relationship from both sides.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::ResourceNotFound`] /
    /// [`TaggingError::RelationshipNotFound`] /
    /// [`TaggingError::VocabularyNotFound`] for missing pieces, and
    /// [`TaggingError::ConsistencyViolation`] when the vocabulary side lacks
    /// the mirror entry.
    pub async fn delete_relationship(
        &self,
        resource: &ResourceRef,
        vocabulary_name: &str,
        application: &str,
    ) -> TaggingResult<Resource> {
        let name = vocabulary_name.to_lowercase();

        let mut doc = self
            .resources
            .find_one(resource.resource_type, &resource.id)
            .await
            .map_err(map_resource_error)?
            .ok_or_else(|| TaggingError::ResourceNotFound(resource.id.clone()))?;

        if !doc.detach_vocabulary(&name, application) {
            return Err(TaggingError::RelationshipNotFound(format!(
                "vocabulary {name} is not associated with {} {}",
                resource.resource_type, resource.id
            )));
        }

        let mut vocabulary = self
            .vocabularies
            .find_one(&name, application)
            .await
            .map_err(map_vocabulary_error)?
            .ok_or_else(|| TaggingError::VocabularyNotFound(name.clone()))?;

        if !vocabulary.detach_resource(resource) {
            return Err(TaggingError::ConsistencyViolation(format!(
                "{} {} carried vocabulary {name} but the vocabulary does not list it",
                resource.resource_type, resource.id
            )));
        }
        vocabulary.updated_at = Utc::now();

        // The resource document exists only while something is tagged on it.
        if doc.vocabularies.is_empty() {
            self.resources
                .delete(resource.resource_type, &resource.id)
                .await
                .map_err(map_resource_error)?;
        } else {
            self.resources.save(&doc).await.map_err(map_resource_error)?;
        }
        self.vocabularies
            .save(&vocabulary)
            .await
            .map_err(map_vocabulary_error)?;

        Ok(doc)
    }

    /// Clone every vocabulary relationship of a dataset onto a new dataset.
    ///
    /// # Errors
    ///
    /// Returns [`TaggingError::CloneNotValid`] on field failures,
    /// [`TaggingError::ResourceNotFound`] when the source dataset carries no
    /// relationships, [`TaggingError::ResourceDuplicated`] when the target
    /// dataset already does, and [`TaggingError::ConsistencyViolation`] when
    /// a source attachment references a missing vocabulary.
    pub async fn clone_dataset(
        &self,
        dataset: &str,
        candidate: CloneCandidate,
    ) -> TaggingResult<Resource> {
        let new_dataset = validate_clone(candidate)?;
        let source_ref = ResourceRef::dataset(dataset);

        let source = self
            .resources
            .find_one(source_ref.resource_type, &source_ref.id)
            .await
            .map_err(map_resource_error)?
            .ok_or_else(|| TaggingError::ResourceNotFound(source_ref.id.clone()))?;

        let target_ref = ResourceRef::dataset(new_dataset.clone());
        let existing = self
            .resources
            .find_one(target_ref.resource_type, &target_ref.id)
            .await
            .map_err(map_resource_error)?;
        if existing.is_some() {
            return Err(TaggingError::ResourceDuplicated(new_dataset));
        }

        let mut target = Resource::untagged(&target_ref);
        target.vocabularies = source.vocabularies.clone();

        for attachment in &target.vocabularies {
            let mut vocabulary = self
                .vocabularies
                .find_one(&attachment.name, &attachment.application)
                .await
                .map_err(map_vocabulary_error)?
                .ok_or_else(|| {
                    TaggingError::ConsistencyViolation(format!(
                        "dataset {dataset} carries vocabulary {} which does not exist",
                        attachment.name
                    ))
                })?;
            vocabulary
                .resources
                .push(resource_tag_for(&target, attachment.tags.clone()));
            vocabulary.updated_at = Utc::now();
            self.vocabularies
                .save(&vocabulary)
                .await
                .map_err(map_vocabulary_error)?;
        }

        self.resources
            .save(&target)
            .await
            .map_err(map_resource_error)?;

        for attachment in &target.vocabularies {
            self.graph
                .associate(target.resource_type, &target.id, &attachment.tags)
                .await
                .map_err(map_graph_error)?;
        }

        Ok(target)
    }
}
