//! Collection HTTP handlers.
//!
//! ```text
//! GET    /api/v1/collection
//! POST   /api/v1/collection
//! GET    /api/v1/collection/{id}
//! PATCH  /api/v1/collection/{id}
//! DELETE /api/v1/collection/{id}
//! POST   /api/v1/collection/{id}/resource
//! DELETE /api/v1/collection/{id}/resource/{resourceType}/{resourceId}
//! ```

use actix_web::{delete, get, patch, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{RequestUser, require_logged_user};
use super::error::ApiResult;
use super::serializers::{
    CollectionEnvelope, CollectionListEnvelope, serialize_collection, serialize_collections,
};
use super::state::HttpState;
use super::vocabularies::ApplicationQuery;
use crate::domain::{
    CollectionCandidate, CollectionResourceCandidate, CollectionUpdate, LoggedUser, TaggingError,
    parse_resource_type,
};

/// One resource reference inside a collection payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CollectionResourceRequest {
    /// Resource identifier.
    pub id: Option<String>,
    /// Resource kind.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

impl From<CollectionResourceRequest> for CollectionResourceCandidate {
    fn from(value: CollectionResourceRequest) -> Self {
        Self {
            id: value.id,
            resource_type: value.resource_type,
        }
    }
}

/// Request payload for creating a collection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCreateRequest {
    /// Collection name.
    pub name: Option<String>,
    /// Application; must be one of the caller's authorized applications.
    pub application: Option<String>,
    /// Initial resource references.
    pub resources: Option<Vec<CollectionResourceRequest>>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

/// Request payload for updating a collection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUpdateRequest {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement resource references.
    pub resources: Option<Vec<CollectionResourceRequest>>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

/// Request payload for adding one resource reference to a collection.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResourceAddRequest {
    /// Resource identifier.
    pub id: Option<String>,
    /// Resource kind.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

fn parse_collection_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse()
        .map_err(|_| TaggingError::CollectionNotFound(raw.to_owned()))
}

fn into_candidates(
    resources: Option<Vec<CollectionResourceRequest>>,
) -> Option<Vec<CollectionResourceCandidate>> {
    resources.map(|resources| resources.into_iter().map(Into::into).collect())
}

/// List the caller's collections.
#[utoipa::path(
    get,
    path = "/api/v1/collection",
    params(
        ("application" = Option<String>, Query, description = "Application filter"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Collections", body = CollectionListEnvelope),
        (status = 401, description = "Missing loggedUser context")
    ),
    tags = ["collection"],
    operation_id = "listCollections"
)]
#[get("/collection")]
pub async fn list_collections(
    state: web::Data<HttpState>,
    query: web::Query<ApplicationQuery>,
    user: RequestUser,
) -> ApiResult<web::Json<CollectionListEnvelope>> {
    let collections = state
        .collections
        .list(&user.0, query.application.as_deref())
        .await?;
    Ok(web::Json(serialize_collections(&collections)))
}

/// Create a collection after validation and a duplicate probe.
#[utoipa::path(
    post,
    path = "/api/v1/collection",
    request_body = CollectionCreateRequest,
    responses(
        (status = 200, description = "Created collection", body = CollectionEnvelope),
        (status = 400, description = "Collection not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 403, description = "Application not authorized"),
        (status = 409, description = "Collection duplicated")
    ),
    tags = ["collection"],
    operation_id = "createCollection"
)]
#[post("/collection")]
pub async fn create_collection(
    state: web::Data<HttpState>,
    payload: web::Json<CollectionCreateRequest>,
) -> ApiResult<web::Json<CollectionEnvelope>> {
    let payload = payload.into_inner();
    let user = require_logged_user(payload.logged_user)?;
    let collection = state
        .collections
        .create(
            CollectionCandidate {
                name: payload.name,
                application: payload.application,
                resources: into_candidates(payload.resources),
            },
            &user,
        )
        .await?;
    Ok(web::Json(serialize_collection(&collection)))
}

/// Fetch one collection owned by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/collection/{id}",
    params(
        ("id" = String, Path, description = "Collection identifier"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Collection", body = CollectionEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Collection not found")
    ),
    tags = ["collection"],
    operation_id = "getCollection"
)]
#[get("/collection/{id}")]
pub async fn get_collection(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    user: RequestUser,
) -> ApiResult<web::Json<CollectionEnvelope>> {
    let id = parse_collection_id(&path)?;
    let collection = state.collections.get(id, &user.0).await?;
    Ok(web::Json(serialize_collection(&collection)))
}

/// Rename a collection or replace its resource references.
#[utoipa::path(
    patch,
    path = "/api/v1/collection/{id}",
    params(("id" = String, Path, description = "Collection identifier")),
    request_body = CollectionUpdateRequest,
    responses(
        (status = 200, description = "Updated collection", body = CollectionEnvelope),
        (status = 400, description = "Collection not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Collection not found"),
        (status = 409, description = "Collection duplicated")
    ),
    tags = ["collection"],
    operation_id = "updateCollection"
)]
#[patch("/collection/{id}")]
pub async fn update_collection(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CollectionUpdateRequest>,
) -> ApiResult<web::Json<CollectionEnvelope>> {
    let id = parse_collection_id(&path)?;
    let payload = payload.into_inner();
    let user = require_logged_user(payload.logged_user)?;
    let collection = state
        .collections
        .update(
            id,
            CollectionUpdate {
                name: payload.name,
                resources: into_candidates(payload.resources),
            },
            &user,
        )
        .await?;
    Ok(web::Json(serialize_collection(&collection)))
}

/// Delete one collection owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/collection/{id}",
    params(
        ("id" = String, Path, description = "Collection identifier"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Deleted collection", body = CollectionEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Collection not found")
    ),
    tags = ["collection"],
    operation_id = "deleteCollection"
)]
#[delete("/collection/{id}")]
pub async fn delete_collection(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    user: RequestUser,
) -> ApiResult<web::Json<CollectionEnvelope>> {
    let id = parse_collection_id(&path)?;
    let collection = state.collections.delete(id, &user.0).await?;
    Ok(web::Json(serialize_collection(&collection)))
}

/// Add one resource reference to a collection.
#[utoipa::path(
    post,
    path = "/api/v1/collection/{id}/resource",
    params(("id" = String, Path, description = "Collection identifier")),
    request_body = CollectionResourceAddRequest,
    responses(
        (status = 200, description = "Updated collection", body = CollectionEnvelope),
        (status = 400, description = "Resource reference not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Collection not found"),
        (status = 409, description = "Association duplicated")
    ),
    tags = ["collection"],
    operation_id = "addCollectionResource"
)]
#[post("/collection/{id}/resource")]
pub async fn add_collection_resource(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<CollectionResourceAddRequest>,
) -> ApiResult<web::Json<CollectionEnvelope>> {
    let id = parse_collection_id(&path)?;
    let payload = payload.into_inner();
    let user = require_logged_user(payload.logged_user)?;
    let collection = state
        .collections
        .add_resource(
            id,
            CollectionResourceCandidate {
                id: payload.id,
                resource_type: payload.resource_type,
            },
            &user,
        )
        .await?;
    Ok(web::Json(serialize_collection(&collection)))
}

/// Remove one resource reference from a collection.
#[utoipa::path(
    delete,
    path = "/api/v1/collection/{id}/resource/{resourceType}/{resourceId}",
    params(
        ("id" = String, Path, description = "Collection identifier"),
        ("resourceType" = String, Path, description = "Resource kind"),
        ("resourceId" = String, Path, description = "Resource identifier"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Updated collection", body = CollectionEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Collection or reference not found")
    ),
    tags = ["collection"],
    operation_id = "removeCollectionResource"
)]
#[delete("/collection/{id}/resource/{resource_type}/{resource_id}")]
pub async fn remove_collection_resource(
    state: web::Data<HttpState>,
    path: web::Path<(String, String, String)>,
    user: RequestUser,
) -> ApiResult<web::Json<CollectionEnvelope>> {
    let (raw_id, raw_type, resource_id) = path.into_inner();
    let id = parse_collection_id(&raw_id)?;
    let resource_type = parse_resource_type(&raw_type)?;
    let collection = state
        .collections
        .remove_resource(id, resource_type, &resource_id, &user.0)
        .await?;
    Ok(web::Json(serialize_collection(&collection)))
}
