//! Vocabulary aggregate and its write candidates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::resource::{ResourceRef, ResourceType};

/// Lifecycle status of a vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VocabularyStatus {
    /// Being assembled; not yet offered to taggers.
    Draft,
    /// Live and usable for tagging.
    #[default]
    Published,
    /// Retired; retained for existing relationships only.
    Disabled,
}

impl VocabularyStatus {
    /// Lowercase wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for VocabularyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown vocabulary status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown vocabulary status: {0}")]
pub struct ParseVocabularyStatusError(String);

impl FromStr for VocabularyStatus {
    type Err = ParseVocabularyStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "disabled" => Ok(Self::Disabled),
            other => Err(ParseVocabularyStatusError(other.to_owned())),
        }
    }
}

/// A resource attachment carried by a vocabulary document; the mirror of
/// [`super::resource::VocabularyTag`] on the vocabulary side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTag {
    /// Resource identifier.
    pub id: String,
    /// Dataset the resource belongs to.
    pub dataset: String,
    /// Kind of the resource.
    pub resource_type: ResourceType,
    /// Tags associated through this relationship.
    pub tags: Vec<String>,
}

/// A named, application-scoped set of tag associations across resources.
///
/// Invariant: `(name, application)` is unique; the duplicate checker probes
/// the store before any create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vocabulary {
    /// Vocabulary name; doubles as its identifier within an application.
    pub name: String,
    /// Application owning the vocabulary.
    pub application: String,
    /// Lifecycle status.
    pub status: VocabularyStatus,
    /// Ordered resource attachments.
    pub resources: Vec<ResourceTag>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Vocabulary {
    /// A fresh vocabulary with no attachments, stamped with `now`.
    pub fn new(
        name: impl Into<String>,
        application: impl Into<String>,
        status: VocabularyStatus,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            application: application.into(),
            status,
            resources: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Find the attachment for `resource`, if any.
    pub fn resource(&self, resource: &ResourceRef) -> Option<&ResourceTag> {
        self.resources
            .iter()
            .find(|tag| tag.id == resource.id && tag.resource_type == resource.resource_type)
    }

    /// Remove the attachment for `resource`; returns whether one was present.
    pub fn detach_resource(&mut self, resource: &ResourceRef) -> bool {
        let before = self.resources.len();
        self.resources
            .retain(|tag| !(tag.id == resource.id && tag.resource_type == resource.resource_type));
        self.resources.len() != before
    }
}

/// Unvalidated vocabulary write payload as received from the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyCandidate {
    /// Requested vocabulary name.
    pub name: Option<String>,
    /// Requested owning application.
    pub application: Option<String>,
    /// Requested lifecycle status; defaults to published.
    pub status: Option<VocabularyStatus>,
}

/// A vocabulary payload that passed validation; `name` and `application` are
/// canonical (lower-cased) so duplicate checks compare like with like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidVocabulary {
    /// Canonical vocabulary name.
    pub name: String,
    /// Canonical owning application.
    pub application: String,
    /// Lifecycle status to persist.
    pub status: VocabularyStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_published() {
        assert_eq!(VocabularyStatus::default(), VocabularyStatus::Published);
    }

    #[test]
    fn resource_lookup_matches_id_and_kind() {
        let now = Utc::now();
        let mut vocabulary = Vocabulary::new("climate", "rw", VocabularyStatus::Published, now);
        vocabulary.resources.push(ResourceTag {
            id: "d1".to_owned(),
            dataset: "d1".to_owned(),
            resource_type: ResourceType::Dataset,
            tags: vec!["co2".to_owned()],
        });

        let dataset = ResourceRef::dataset("d1");
        assert!(vocabulary.resource(&dataset).is_some());

        let layer = ResourceRef {
            id: "d1".to_owned(),
            dataset: "d1".to_owned(),
            resource_type: ResourceType::Layer,
        };
        assert!(vocabulary.resource(&layer).is_none());

        assert!(vocabulary.detach_resource(&dataset));
        assert!(!vocabulary.detach_resource(&dataset));
    }
}
