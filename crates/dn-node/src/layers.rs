//! Cross-cutting HTTP behavior shared by every node router.
//!
//! Unmatched routes get a plain-text 404, handler panics are turned into a
//! plain-text 500, and every response carries a fixed set of hardening
//! headers.

use std::any::Any;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Body returned for unmatched routes.
pub const NOT_FOUND_BODY: &str = "404 - Not Found";

/// Body returned when a handler panics.
pub const PANIC_BODY: &str = "Something broke!";

/// Hardening headers attached to every response.
pub const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-dns-prefetch-control", "off"),
    ("x-download-options", "noopen"),
    ("x-permitted-cross-domain-policies", "none"),
    ("referrer-policy", "no-referrer"),
    ("x-xss-protection", "0"),
    ("cross-origin-opener-policy", "same-origin"),
    ("cross-origin-resource-policy", "same-origin"),
];

/// Fallback handler for unmatched routes.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY)
}

/// Convert a caught handler panic into a 500 response.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    error!(panic = %detail, "request handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, PANIC_BODY).into_response()
}

/// Wrap `router` with the fallback, panic handler, hardening headers and
/// request tracing.
pub fn harden(router: Router) -> Router {
    let mut router = router
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic));

    for (name, value) in SECURITY_HEADERS {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(*name),
            HeaderValue::from_static(*value),
        ));
    }

    router.layer(TraceLayer::new_for_http())
}
