use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::database::models::CategoryWithCount;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{CategoryPayload, CategoryService};
use crate::state::AppState;

/// GET /dashboard/categories - every category by name, with product counts
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CategoryWithCount>> {
    let categories = CategoryService::new(state.pool.clone()).list().await?;
    Ok(ApiResponse::success(categories))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<CategoryWithCount> {
    let Json(payload) = payload?;
    let category = CategoryService::new(state.pool.clone()).create(payload).await?;
    Ok(ApiResponse::created(category))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<CategoryWithCount> {
    let Path(id) = id?;
    let category = CategoryService::new(state.pool.clone()).get(id).await?;
    Ok(ApiResponse::success(category))
}

pub async fn put(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<CategoryWithCount> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let category = CategoryService::new(state.pool.clone()).replace(id, payload).await?;
    Ok(ApiResponse::success(category))
}

pub async fn patch(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> ApiResult<CategoryWithCount> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let category = CategoryService::new(state.pool.clone()).patch(id, payload).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /dashboard/categories/:id - refused while products reference it
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    CategoryService::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::no_content())
}
