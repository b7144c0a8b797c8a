use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Path, Query, State,
};

use crate::api::DashboardReview;
use crate::database::ReviewRepository;
use crate::error::ApiError;
use crate::filter::{ReviewFilterSpec, ReviewListParams};
use crate::middleware::{ApiResponse, ApiResult, RequestOrigin};
use crate::pagination::{Page, PageRequest};
use crate::state::AppState;

/// GET /dashboard/reviews - newest first, filterable by rating, product and text
pub async fn list(
    State(state): State<AppState>,
    origin: RequestOrigin,
    params: Result<Query<ReviewListParams>, QueryRejection>,
) -> ApiResult<Page<DashboardReview>> {
    let Query(params) = params?;
    let spec = ReviewFilterSpec::from_params(&params)?;
    let page_request = PageRequest::from_params(
        params.page.as_deref(),
        params.page_size.as_deref(),
        &state.config.filter,
    )?;

    let repository = ReviewRepository::new(state.pool.clone());
    let count = repository.count(spec.to_filter()).await?;

    let mut filter = spec.to_filter();
    page_request.apply(&mut filter)?;
    let rows = repository.list(filter, state.config.filter.debug_logging).await?;

    let page = Page::new(rows, count, &page_request, origin.current_url().as_ref())
        .map(DashboardReview::from);
    Ok(ApiResponse::success(page))
}

/// DELETE /dashboard/reviews/:id
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = id?;
    if !ReviewRepository::new(state.pool.clone()).delete(id).await? {
        return Err(ApiError::not_found("Review not found"));
    }
    tracing::info!(review_id = id, "Deleted review");
    Ok(ApiResponse::no_content())
}
