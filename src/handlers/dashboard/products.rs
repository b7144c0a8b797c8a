use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};

use crate::api::{DashboardProduct, MediaUrls};
use crate::database::ProductRepository;
use crate::filter::{ProductFilterSpec, ProductListParams};
use crate::middleware::{ApiResponse, ApiResult, RequestOrigin};
use crate::pagination::{Page, PageRequest};
use crate::services::{BulkUpdateRequest, BulkUpdateResult, BulkUpdateService, ProductPayload, ProductService};
use crate::state::AppState;

/// GET /dashboard/products - filtered, sorted, paginated product listing
pub async fn list(
    State(state): State<AppState>,
    origin: RequestOrigin,
    params: Result<Query<ProductListParams>, QueryRejection>,
) -> ApiResult<Page<DashboardProduct>> {
    let Query(params) = params?;
    let spec = ProductFilterSpec::from_params(&params)?;
    let page_request = PageRequest::from_params(
        params.page.as_deref(),
        params.page_size.as_deref(),
        &state.config.filter,
    )?;

    let repository = ProductRepository::new(state.pool.clone());
    let count = repository.count(spec.to_filter()).await?;

    let mut filter = spec.to_filter();
    page_request.apply(&mut filter)?;
    let rows = repository.list(filter, state.config.filter.debug_logging).await?;

    let media = MediaUrls::new(&origin, &state.config.media.url_prefix);
    let page = Page::new(rows, count, &page_request, origin.current_url().as_ref())
        .map(|row| DashboardProduct::from_listing(row, &media));
    Ok(ApiResponse::success(page))
}

/// POST /dashboard/products
pub async fn create(
    State(state): State<AppState>,
    origin: RequestOrigin,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<DashboardProduct> {
    let Json(payload) = payload?;
    let product = ProductService::new(state.pool.clone()).create(payload).await?;
    let media = MediaUrls::new(&origin, &state.config.media.url_prefix);
    Ok(ApiResponse::created(DashboardProduct::from_listing(product, &media)))
}

/// GET /dashboard/products/:id
pub async fn get(
    State(state): State<AppState>,
    origin: RequestOrigin,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<DashboardProduct> {
    let Path(id) = id?;
    let product = ProductService::new(state.pool.clone()).get(id).await?;
    let media = MediaUrls::new(&origin, &state.config.media.url_prefix);
    Ok(ApiResponse::success(DashboardProduct::from_listing(product, &media)))
}

/// PUT /dashboard/products/:id - full replacement
pub async fn put(
    State(state): State<AppState>,
    origin: RequestOrigin,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<DashboardProduct> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let product = ProductService::new(state.pool.clone()).replace(id, payload).await?;
    let media = MediaUrls::new(&origin, &state.config.media.url_prefix);
    Ok(ApiResponse::success(DashboardProduct::from_listing(product, &media)))
}

/// PATCH /dashboard/products/:id - only the supplied fields change
pub async fn patch(
    State(state): State<AppState>,
    origin: RequestOrigin,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<DashboardProduct> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    let product = ProductService::new(state.pool.clone()).patch(id, payload).await?;
    let media = MediaUrls::new(&origin, &state.config.media.url_prefix);
    Ok(ApiResponse::success(DashboardProduct::from_listing(product, &media)))
}

/// DELETE /dashboard/products/:id
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    ProductService::new(state.pool.clone()).delete(id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /dashboard/products/bulk-update
pub async fn bulk_update(
    State(state): State<AppState>,
    payload: Result<Json<BulkUpdateRequest>, JsonRejection>,
) -> ApiResult<BulkUpdateResult> {
    let Json(request) = payload?;
    let result = BulkUpdateService::new(state.pool.clone()).apply(request).await?;
    Ok(ApiResponse::success(result))
}
