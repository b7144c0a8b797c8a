pub mod auth;
pub mod origin;
pub mod response;
pub mod role;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use origin::RequestOrigin;
pub use response::{ApiResponse, ApiResult};
pub use role::{authorize, require_staff, require_superuser, Role};
