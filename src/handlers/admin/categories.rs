// handlers/admin/categories.rs - /api/admin/categories handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use super::utils::{parse_id, ListQuery};
use crate::app::AppState;
use crate::database::models::{Category, CategoryFilter};
use crate::database::CategoryRepository;
use crate::error::ApiError;
use crate::middleware::{AdminSession, ApiResponse, ApiResult};
use crate::types::Pagination;
use crate::validation::{CategoryInput, StatusInput};

const NOT_FOUND: &str = "Category not found";

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
    pub pagination: Pagination,
}

/// GET /api/admin/categories
pub async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(query): Query<ListQuery>,
) -> ApiResult<CategoryList> {
    let page = query.page_request(&state.catalog);
    let filter = CategoryFilter {
        search: query.search(),
        status: query.status()?,
    };

    let repository = CategoryRepository::new(state.pool.clone());
    let total = repository.count(&filter).await?;
    let categories = repository.list(&filter, &page).await?;

    Ok(ApiResponse::ok(CategoryList {
        categories,
        pagination: page.paginate(total),
    }))
}

/// POST /api/admin/categories
pub async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Category> {
    let Json(input) = body?;
    let new = input.into_new()?;

    let repository = CategoryRepository::new(state.pool.clone());
    if repository.slug_exists(&new.slug).await? {
        return Err(ApiError::bad_request("Slug already exists"));
    }

    let category = repository.create(&new).await?;
    Ok(ApiResponse::created(category))
}

/// GET /api/admin/categories/:id
pub async fn show(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Category> {
    let id = parse_id(&id, NOT_FOUND)?;
    let category = CategoryRepository::new(state.pool.clone()).get(id).await?;
    Ok(ApiResponse::ok(category))
}

/// PUT /api/admin/categories/:id
pub async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    body: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<Category> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(input) = body?;
    let changes = input.into_changes(id)?;

    let repository = CategoryRepository::new(state.pool.clone());
    let existing = repository.get(id).await?;

    if let Some(slug) = changes.slug.as_deref() {
        if slug != existing.slug && repository.slug_exists(slug).await? {
            return Err(ApiError::bad_request("Slug already exists"));
        }
    }

    let category = repository.update(id, &changes).await?;
    Ok(ApiResponse::ok(category))
}

/// DELETE /api/admin/categories/:id
pub async fn delete(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&id, NOT_FOUND)?;
    CategoryRepository::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::ok(json!({ "message": "Category deleted successfully" })))
}

/// PATCH /api/admin/categories/:id/status
pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<String>,
    body: Result<Json<StatusInput>, JsonRejection>,
) -> ApiResult<Category> {
    let id = parse_id(&id, NOT_FOUND)?;
    let Json(input) = body?;
    let status = input.parse()?;

    let category = CategoryRepository::new(state.pool.clone())
        .set_status(id, status)
        .await?;
    Ok(ApiResponse::ok(category))
}
