use axum::extract::State;
use chrono::Utc;

use crate::database::{DashboardStats, StatsRepository};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /dashboard/stats - catalog totals, stock split, average rating, products added this month
pub async fn get(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    let stats = StatsRepository::new(state.pool.clone())
        .dashboard(Utc::now())
        .await?;
    Ok(ApiResponse::success(stats))
}
