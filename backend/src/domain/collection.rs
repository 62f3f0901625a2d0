//! User-owned collections of resource references.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resource::ResourceType;

/// One `(id, type)` resource reference inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResource {
    /// Resource identifier.
    pub id: String,
    /// Kind of the resource.
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
}

/// A user-owned named group of resource references.
///
/// Invariant: `(name, application, owner_id)` is unique; the duplicate
/// checker enforces this, not the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    /// Stable collection identifier.
    pub id: Uuid,
    /// Collection name, unique per owner and application.
    pub name: String,
    /// Application the collection belongs to.
    pub application: String,
    /// Identifier of the owning user.
    pub owner_id: String,
    /// Ordered resource references.
    pub resources: Vec<CollectionResource>,
}

impl Collection {
    /// Whether the collection already references `(id, resource_type)`.
    pub fn contains(&self, id: &str, resource_type: ResourceType) -> bool {
        self.resources
            .iter()
            .any(|member| member.id == id && member.resource_type == resource_type)
    }

    /// Remove the reference for `(id, resource_type)`; returns whether one
    /// was present.
    pub fn remove(&mut self, id: &str, resource_type: ResourceType) -> bool {
        let before = self.resources.len();
        self.resources
            .retain(|member| !(member.id == id && member.resource_type == resource_type));
        self.resources.len() != before
    }
}

/// Unvalidated element of a collection's `resources` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResourceCandidate {
    /// Resource identifier, required.
    pub id: Option<String>,
    /// Resource kind, required and drawn from the [`ResourceType`] enum.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

/// Unvalidated collection create payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCandidate {
    /// Requested collection name.
    pub name: Option<String>,
    /// Requested application; defaults to the baseline application.
    pub application: Option<String>,
    /// Initial resource references, if any.
    pub resources: Option<Vec<CollectionResourceCandidate>>,
}

/// Unvalidated collection update payload; absent fields stay untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUpdate {
    /// Replacement name, if renaming.
    pub name: Option<String>,
    /// Replacement resource references, if provided.
    pub resources: Option<Vec<CollectionResourceCandidate>>,
}

/// A collection create payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCollection {
    /// Collection name.
    pub name: String,
    /// Application the collection belongs to, defaulted and authorized.
    pub application: String,
    /// Validated resource references.
    pub resources: Vec<CollectionResource>,
}
