//! Favourite HTTP handlers.
//!
//! ```text
//! GET    /api/v1/favourite
//! POST   /api/v1/favourite
//! GET    /api/v1/favourite/{id}
//! DELETE /api/v1/favourite/{id}
//! ```

use actix_web::{delete, get, post, web};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::auth::{RequestUser, require_logged_user};
use super::error::ApiResult;
use super::serializers::{
    FavouriteEnvelope, FavouriteListEnvelope, serialize_favourite, serialize_favourites,
};
use super::state::HttpState;
use super::vocabularies::ApplicationQuery;
use crate::domain::{FavouriteCandidate, LoggedUser, TaggingError};

/// Request payload for creating a favourite.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteCreateRequest {
    /// Kind of the bookmarked resource.
    pub resource_type: Option<String>,
    /// Identifier of the bookmarked resource.
    pub resource_id: Option<String>,
    /// Application; defaults to the baseline application.
    pub application: Option<String>,
    /// Authenticated context forwarded by the gateway.
    #[schema(value_type = Object)]
    pub logged_user: Option<LoggedUser>,
}

fn parse_favourite_id(raw: &str) -> ApiResult<Uuid> {
    raw.parse()
        .map_err(|_| TaggingError::FavouriteNotFound(raw.to_owned()))
}

/// List the caller's favourites.
#[utoipa::path(
    get,
    path = "/api/v1/favourite",
    params(
        ("application" = Option<String>, Query, description = "Application filter"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Favourites", body = FavouriteListEnvelope),
        (status = 401, description = "Missing loggedUser context")
    ),
    tags = ["favourite"],
    operation_id = "listFavourites"
)]
#[get("/favourite")]
pub async fn list_favourites(
    state: web::Data<HttpState>,
    query: web::Query<ApplicationQuery>,
    user: RequestUser,
) -> ApiResult<web::Json<FavouriteListEnvelope>> {
    let favourites = state
        .favourites
        .list(&user.0, query.application.as_deref())
        .await?;
    Ok(web::Json(serialize_favourites(&favourites)))
}

/// Create a favourite after validation and a duplicate probe.
#[utoipa::path(
    post,
    path = "/api/v1/favourite",
    request_body = FavouriteCreateRequest,
    responses(
        (status = 200, description = "Created favourite", body = FavouriteEnvelope),
        (status = 400, description = "Favourite not valid"),
        (status = 401, description = "Missing loggedUser context"),
        (status = 409, description = "Favourite duplicated")
    ),
    tags = ["favourite"],
    operation_id = "createFavourite"
)]
#[post("/favourite")]
pub async fn create_favourite(
    state: web::Data<HttpState>,
    payload: web::Json<FavouriteCreateRequest>,
) -> ApiResult<web::Json<FavouriteEnvelope>> {
    let payload = payload.into_inner();
    let user = require_logged_user(payload.logged_user)?;
    let favourite = state
        .favourites
        .create(
            FavouriteCandidate {
                resource_type: payload.resource_type,
                resource_id: payload.resource_id,
                application: payload.application,
            },
            &user,
        )
        .await?;
    Ok(web::Json(serialize_favourite(&favourite)))
}

/// Fetch one favourite owned by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/favourite/{id}",
    params(
        ("id" = String, Path, description = "Favourite identifier"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Favourite", body = FavouriteEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 403, description = "Owned by another user"),
        (status = 404, description = "Favourite not found")
    ),
    tags = ["favourite"],
    operation_id = "getFavourite"
)]
#[get("/favourite/{id}")]
pub async fn get_favourite(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    user: RequestUser,
) -> ApiResult<web::Json<FavouriteEnvelope>> {
    let id = parse_favourite_id(&path)?;
    let favourite = state.favourites.get(id, &user.0).await?;
    Ok(web::Json(serialize_favourite(&favourite)))
}

/// Delete one favourite owned by the caller.
#[utoipa::path(
    delete,
    path = "/api/v1/favourite/{id}",
    params(
        ("id" = String, Path, description = "Favourite identifier"),
        ("loggedUser" = String, Query, description = "JSON-encoded authenticated context")
    ),
    responses(
        (status = 200, description = "Deleted favourite", body = FavouriteEnvelope),
        (status = 401, description = "Missing loggedUser context"),
        (status = 404, description = "Favourite not found")
    ),
    tags = ["favourite"],
    operation_id = "deleteFavourite"
)]
#[delete("/favourite/{id}")]
pub async fn delete_favourite(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    user: RequestUser,
) -> ApiResult<web::Json<FavouriteEnvelope>> {
    let id = parse_favourite_id(&path)?;
    let favourite = state.favourites.delete(id, &user.0).await?;
    Ok(web::Json(serialize_favourite(&favourite)))
}
