//! Security response headers and CORS.
//!
//! # Responsibilities
//! - Add `x-content-type-options`, `x-frame-options` and `referrer-policy`
//!   to every response that does not already carry them
//! - Restrict cross-origin access to the configured front-end origin
//!
//! Content-Security-Policy is left to the fronting reverse proxy.

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CorsConfig;

pub fn apply(router: Router) -> Router {
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
}

/// CORS for the configured origin. `*` allows any origin without
/// credentials; a concrete origin also allows credentials.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ]);

    if config.allowed_origin == "*" {
        return base.allow_origin(AllowOrigin::any());
    }

    match HeaderValue::from_str(&config.allowed_origin) {
        Ok(origin) => base
            .allow_origin(AllowOrigin::exact(origin))
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(
                origin = %config.allowed_origin,
                "Invalid CORS origin, cross-origin requests will be refused"
            );
            base
        }
    }
}
