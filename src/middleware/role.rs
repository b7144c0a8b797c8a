use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Privilege tiers checked by the role gate. The flags are independent:
/// a superuser without the staff flag is not a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Staff,
    Superuser,
}

impl Role {
    fn denial(&self) -> &'static str {
        match self {
            Role::Staff => "Admin access required",
            Role::Superuser => "Superuser access required",
        }
    }
}

/// Permit or refuse `user` for `role`.
pub fn authorize(user: &AuthUser, role: Role) -> Result<(), ApiError> {
    let permitted = match role {
        Role::Staff => user.is_staff,
        Role::Superuser => user.is_superuser,
    };
    if permitted {
        Ok(())
    } else {
        tracing::warn!(user_id = user.user_id, ?role, "Refused request lacking role");
        Err(ApiError::forbidden(role.denial()))
    }
}

async fn require_role(role: Role, request: Request, next: Next) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
    authorize(user, role)?;
    Ok(next.run(request).await)
}

/// Layer after `jwt_auth_middleware` on staff-only route groups.
pub async fn require_staff(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Staff, request, next).await
}

/// Layer after `jwt_auth_middleware` on superuser-only route groups.
pub async fn require_superuser(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Superuser, request, next).await
}
