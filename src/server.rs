use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{dashboard, elevated, public};
use crate::middleware::{jwt_auth_middleware, require_staff, require_superuser};
use crate::state::AppState;

/// Assemble the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(public::health))
        .route("/auth/login", post(public::login))
        .nest("/dashboard", dashboard_routes(&state))
        .nest("/admin", admin_routes(&state))
        .layer(cors_layer(&state.config.security));

    public::media::mount(api, &state.config.media)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Staff-only dashboard API. Token validation runs first, then the role gate.
fn dashboard_routes(state: &AppState) -> Router<AppState> {
    use dashboard::{categories, products, reviews};

    Router::new()
        .route("/stats", get(dashboard::stats_get))
        .route("/products", get(products::list).post(products::create))
        .route("/products/bulk-update", post(products::bulk_update))
        .route(
            "/products/:id",
            get(products::get)
                .put(products::put)
                .patch(products::patch)
                .delete(products::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get)
                .put(categories::put)
                .patch(categories::patch)
                .delete(categories::delete),
        )
        .route("/reviews", get(reviews::list))
        .route("/reviews/:id", axum::routing::delete(reviews::delete))
        .route_layer(from_fn(require_staff))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    let superuser = Router::new()
        .route("/make-admin", post(elevated::make_admin))
        .route_layer(from_fn(require_superuser));
    let staff = Router::new()
        .route("/users", get(elevated::users))
        .route_layer(from_fn(require_staff));

    superuser
        .merge(staff)
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(_) if origin == "*" => {
                tracing::warn!("Ignoring wildcard CORS origin; credentialed requests need explicit origins");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("ngrok-skip-browser-warning"),
        ])
        .allow_credentials(true)
}
