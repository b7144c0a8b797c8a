use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{request::Parts, HeaderMap, Uri},
};
use std::convert::Infallible;
use url::Url;

use crate::state::AppState;

/// Externally visible origin and path of the current request.
///
/// Used to build absolute media URLs and pagination links. A configured
/// `PUBLIC_BASE_URL` wins. Otherwise the forwarded headers are used when the
/// deployment trusts its proxy, and the Host header when it does not.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOrigin {
    pub origin: String,
    pub path_and_query: String,
}

impl RequestOrigin {
    pub fn from_parts(
        headers: &HeaderMap,
        uri: &Uri,
        public_base_url: Option<&str>,
        trust_forwarded: bool,
    ) -> Self {
        let forwarded = |name: &'static str| {
            if trust_forwarded {
                first_header_value(headers, name)
            } else {
                None
            }
        };
        let origin = match public_base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => {
                let scheme = forwarded("x-forwarded-proto").unwrap_or("http");
                let host = forwarded("x-forwarded-host")
                    .or_else(|| first_header_value(headers, "host"))
                    .unwrap_or("localhost");
                format!("{}://{}", scheme, host)
            }
        };
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Self { origin, path_and_query }
    }

    /// Absolute URL of the current request.
    pub fn current_url(&self) -> Option<Url> {
        Url::parse(&format!("{}{}", self.origin, self.path_and_query)).ok()
    }

    /// Prefix a server-relative path with the origin.
    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Nested routers strip their prefix from `parts.uri`.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        Ok(Self::from_parts(
            &parts.headers,
            &uri,
            state.config.api.public_base_url.as_deref(),
            state.config.api.trust_forwarded_headers,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn host_header_builds_origin() {
        let uri: Uri = "/dashboard/products?page=2".parse().unwrap();
        let origin =
            RequestOrigin::from_parts(&headers(&[("host", "api.shop.test:8000")]), &uri, None, false);
        assert_eq!(origin.origin, "http://api.shop.test:8000");
        assert_eq!(
            origin.current_url().unwrap().as_str(),
            "http://api.shop.test:8000/dashboard/products?page=2"
        );
    }

    fn proxied() -> HeaderMap {
        headers(&[
            ("host", "internal:8000"),
            ("x-forwarded-proto", "https, http"),
            ("x-forwarded-host", "shop.example.com"),
        ])
    }

    #[test]
    fn trusted_forwarded_headers_take_precedence_over_host() {
        let uri: Uri = "/media/a.png".parse().unwrap();
        let origin = RequestOrigin::from_parts(&proxied(), &uri, None, true);
        assert_eq!(origin.origin, "https://shop.example.com");
    }

    #[test]
    fn forwarded_headers_are_ignored_unless_trusted() {
        let uri: Uri = "/media/a.png".parse().unwrap();
        let origin = RequestOrigin::from_parts(&proxied(), &uri, None, false);
        assert_eq!(origin.origin, "http://internal:8000");
    }

    #[test]
    fn configured_base_url_wins() {
        let uri: Uri = "/x".parse().unwrap();
        let origin = RequestOrigin::from_parts(
            &proxied(),
            &uri,
            Some("https://cdn.example.com/"),
            true,
        );
        assert_eq!(origin.absolute("/media/p.jpg"), "https://cdn.example.com/media/p.jpg");
    }
}
