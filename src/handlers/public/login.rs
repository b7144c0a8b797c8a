// handlers/public/login.rs - POST /auth/login

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{generate_jwt, Claims};
use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub token_type: &'static str,
    /// Seconds until `access` expires.
    pub expires_in: i64,
    pub user: User,
}

/// Exchange email and password for a bearer access token.
///
/// Unknown, inactive and wrong-password logins are indistinguishable:
/// all fail with 401 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(request) = payload?;

    let user = UserService::new(state.pool.clone())
        .authenticate(&request.email, &request.password)
        .await?;

    let security = &state.config.security;
    let claims = Claims::for_user(&user, security);
    let access = generate_jwt(&claims, &security.jwt_secret)?;
    tracing::info!(user_id = user.id, "Issued access token");

    Ok(ApiResponse::success(LoginResponse {
        access,
        token_type: "Bearer",
        expires_in: claims.exp - claims.iat,
        user,
    }))
}
