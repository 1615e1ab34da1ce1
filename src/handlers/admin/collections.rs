// handlers/admin/collections.rs - /api/admin/collections handlers
//
// Order of checks in every handler: admin session (401), body validation
// (400), existence (404), slug uniqueness (400), then the write.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::utils::{parse_id, ListQuery};
use crate::app::AppState;
use crate::database::models::{Collection, CollectionFilter};
use crate::database::CollectionRepository;
use crate::error::ApiError;
use crate::middleware::{AdminSession, ApiResponse, ApiResult};
use crate::types::Pagination;
use crate::validation::{CollectionInput, StatusInput};

const NOT_FOUND: &str = "Collection not found";

#[derive(Debug, Serialize)]
pub struct CollectionList {
    pub collections: Vec<Collection>,
    pub pagination: Pagination,
}

/// GET /api/admin/collections - paginated list, newest first
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<CollectionList> {
    let page = query.page_request(&state.catalog);
    let filter = CollectionFilter {
        search: query.search(),
        featured: query.featured(),
        status: query.status()?,
    };

    let repository = CollectionRepository::new(state.pool.clone());
    let total = repository.count(&filter).await?;
    let collections = repository.list(&filter, &page).await?;

    Ok(ApiResponse::ok(CollectionList {
        collections,
        pagination: page.paginate(total),
    }))
}

/// POST /api/admin/collections - create with defaults applied
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    body: Result<Json<CollectionInput>, JsonRejection>,
) -> ApiResult<Collection> {
    let Json(input) = body?;
    let new = input.into_new(&state.catalog.default_image)?;

    let repository = CollectionRepository::new(state.pool.clone());
    if repository.slug_exists(&new.slug).await? {
        return Err(ApiError::bad_request("Slug already exists"));
    }

    let collection = repository.create(&new).await?;
    Ok(ApiResponse::created(collection))
}

/// GET /api/admin/collections/:id
pub async fn show(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Collection> {
    let id = parse_id(&id, NOT_FOUND)?;
    let collection = CollectionRepository::new(state.pool.clone()).get(id).await?;
    Ok(ApiResponse::ok(collection))
}

/// PUT /api/admin/collections/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    body: Result<Json<CollectionInput>, JsonRejection>,
) -> ApiResult<Collection> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(input) = body?;
    let changes = input.into_changes()?;

    let repository = CollectionRepository::new(state.pool.clone());
    let existing = repository.get(id).await?;

    if let Some(slug) = changes.slug.as_deref() {
        if slug != existing.slug && repository.slug_exists(slug).await? {
            return Err(ApiError::bad_request("Slug already exists"));
        }
    }

    let collection = repository.update(id, &changes).await?;
    Ok(ApiResponse::ok(collection))
}

/// DELETE /api/admin/collections/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, NOT_FOUND)?;
    CollectionRepository::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::ok(json!({ "message": "Collection deleted successfully" })))
}

/// PATCH /api/admin/collections/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    body: Result<Json<StatusInput>, JsonRejection>,
) -> ApiResult<Collection> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(input) = body?;
    let status = input.parse()?;

    let collection = CollectionRepository::new(state.pool.clone())
        .set_status(id, status)
        .await?;
    Ok(ApiResponse::ok(collection))
}
