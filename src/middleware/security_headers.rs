//! Security-related response headers.
//!
//! Applied once at the Router level. Every header is only set when the handler
//! did not set it already, so a gated handler can still override any of them
//! through `GateResponse::headers`.

use axum::Router;
use axum::http::header::{HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

const DEFAULTS: &[(&str, &str)] = &[
    // Clickjacking protection (legacy + modern)
    ("x-frame-options", "DENY"),
    ("content-security-policy", "frame-ancestors 'none'"),
    // Prevent MIME sniffing
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    // Responses to credential-bearing requests must not be cached by intermediaries
    ("cache-control", "no-store"),
];

pub fn apply(router: Router) -> Router {
    DEFAULTS.iter().fold(router, |router, &(name, value)| {
        router.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_defaults_are_added() {
        let app = apply(Router::new().route("/", get(|| async { "ok" })));

        let resp = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.headers()["x-frame-options"], "DENY");
        assert_eq!(resp.headers()["cache-control"], "no-store");
    }

    #[tokio::test]
    async fn test_handler_value_is_kept() {
        let app = apply(Router::new().route(
            "/",
            get(|| async { ([("cache-control", "max-age=60")], "ok") }),
        ));

        let resp = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.headers()["cache-control"], "max-age=60");
    }
}
