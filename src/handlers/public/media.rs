use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer};

use crate::config::MediaConfig;
use crate::state::AppState;

pub const ALLOW_METHODS: &str = "GET, OPTIONS";
pub const ALLOW_HEADERS: &str = "ngrok-skip-browser-warning, User-Agent";
pub const EXPOSE_HEADERS: &str =
    "content-type, content-length, cache-control, expires, last-modified, etag";
pub const CACHE_CONTROL: &str = "public, max-age=3600";

/// Mount the media directory under the configured URL prefix.
///
/// Files are readable from any origin and cacheable for an hour. Mount
/// after the API CORS layer so the wildcard origin is left untouched.
pub fn mount(router: Router<AppState>, media: &MediaConfig) -> Router<AppState> {
    let service = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(EXPOSE_HEADERS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL),
        ))
        .service(ServeDir::new(&media.root));

    let mount_path = media.url_prefix.trim_end_matches('/');
    if mount_path.is_empty() {
        router.fallback_service(service)
    } else {
        router.nest_service(mount_path, service)
    }
}
