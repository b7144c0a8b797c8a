use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{MakeAdminRequest, MakeAdminResult, UserService};
use crate::state::AppState;

/// POST /admin/make-admin - grant staff to another user (superuser only)
pub async fn make_admin(
    State(state): State<AppState>,
    payload: Result<Json<MakeAdminRequest>, JsonRejection>,
) -> ApiResult<MakeAdminResult> {
    let Json(request) = payload?;
    let user_id = request.user_id()?;
    let result = UserService::new(state.pool.clone()).make_admin(user_id).await?;
    Ok(ApiResponse::success(result))
}

/// GET /admin/users - all accounts, newest first (staff only)
pub async fn users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = UserService::new(state.pool.clone()).list().await?;
    Ok(ApiResponse::success(users))
}
