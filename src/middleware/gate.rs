//! axum adapter for `RouteGate`.
//!
//! Responsibility:
//! - Mount a gate on a path for GET/HEAD/POST/PUT/PATCH/DELETE
//! - Buffer the request body and build the `GateRequest`
//! - Render the `GateResponse` as JSON, or YAML when the client asks for it
//!
//! Other methods never reach the gate; axum answers them with 405.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    response::Response,
    routing::{MethodFilter, MethodRouter},
};
use tracing::warn;

use crate::error::AppError;
use crate::services::gate::types::header_text;
use crate::services::gate::{GateRequest, GateResponse, HttpMethod, Media, RouteGate};

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Head => MethodFilter::HEAD,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
    }
}

/// Build the method router for one gated path.
///
/// ```ignore
/// let objects = RouteGate::service().authenticate_with(users).on(HttpMethod::Get, list);
/// router = router.route("/objects", middleware::gate::route(objects, 1024 * 1024));
/// ```
pub fn route<S>(gate: RouteGate, body_limit: usize) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let gate = Arc::new(gate);
    HttpMethod::ALL
        .into_iter()
        .fold(MethodRouter::new(), |router, method| {
            let gate = gate.clone();
            router.on(method_filter(method), move |req: Request| {
                let gate = gate.clone();
                async move { serve(&gate, method, req, body_limit).await }
            })
        })
}

async fn serve(
    gate: &RouteGate,
    method: HttpMethod,
    req: Request,
    body_limit: usize,
) -> Result<Response, AppError> {
    let (parts, body) = req.into_parts();
    let format = MediaFormat::negotiate(&parts.headers);

    let body = axum::body::to_bytes(body, body_limit).await.map_err(|err| {
        warn!(route = gate.name(), error = %err, "failed to read request body");
        AppError::bad_request("INVALID_BODY", "request body could not be read")
    })?;

    let gate_req = GateRequest {
        method: parts.method,
        uri: parts.uri,
        headers: parts.headers,
        body,
    };

    let resp = gate.dispatch(method, gate_req).await;
    render(resp, method, format)
}

/// Wire encoding of `Media`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Json,
    Yaml,
}

impl MediaFormat {
    /// YAML when `accept` mentions yaml, JSON otherwise.
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let wants_yaml = headers
            .get(header::ACCEPT)
            .and_then(header_text)
            .is_some_and(|accept| accept.contains("yaml"));

        if wants_yaml { Self::Yaml } else { Self::Json }
    }

    pub fn content_type(&self) -> HeaderValue {
        match self {
            Self::Json => HeaderValue::from_static("application/json"),
            Self::Yaml => HeaderValue::from_static("application/x-yaml"),
        }
    }

    pub fn encode(&self, media: &Media) -> Result<Vec<u8>, AppError> {
        match self {
            Self::Json => Ok(serde_json::to_vec(media)?),
            Self::Yaml => Ok(serde_yaml::to_string(media)?.into_bytes()),
        }
    }
}

pub fn render(
    resp: GateResponse,
    method: HttpMethod,
    format: MediaFormat,
) -> Result<Response, AppError> {
    let GateResponse {
        status,
        media,
        headers,
    } = resp;

    let mut out = match media {
        Some(media) if method != HttpMethod::Head => {
            let mut out = Response::new(Body::from(format.encode(&media)?));
            out.headers_mut()
                .insert(header::CONTENT_TYPE, format.content_type());
            out
        }
        _ => Response::new(Body::empty()),
    };

    *out.status_mut() = status;
    // Handler-set headers win over the defaults above.
    out.headers_mut().extend(headers);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_negotiate_defaults_to_json() {
        assert_eq!(MediaFormat::negotiate(&HeaderMap::new()), MediaFormat::Json);

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        assert_eq!(MediaFormat::negotiate(&headers), MediaFormat::Json);
    }

    #[tokio::test]
    async fn test_each_method_reaches_its_own_hook() {
        use tower::ServiceExt;

        let app: axum::Router = axum::Router::new().route("/", route(RouteGate::service(), 1024));
        for method in HttpMethod::ALL {
            let req = axum::http::Request::builder()
                .method(method.as_str().to_ascii_uppercase().as_str())
                .uri("/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::empty())
                .unwrap();
            let resp = app.clone().oneshot(req).await.unwrap();
            assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED, "{method}");

            if method != HttpMethod::Head {
                let media: Media = serde_json::from_str(&body_text(resp).await).unwrap();
                assert_eq!(
                    media.reason,
                    Some(format!("{} not implemented for this URL path", method.hook_name()))
                );
            }
        }
    }

    #[test]
    fn test_negotiate_yaml() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("yaml"));
        assert_eq!(MediaFormat::negotiate(&headers), MediaFormat::Yaml);
    }

    #[tokio::test]
    async fn test_render_json_body() {
        let mut resp = GateResponse::new();
        resp.media = Some(Media::success("ok").with("object", 42));

        let out = render(resp, HttpMethod::Get, MediaFormat::Json).unwrap();
        assert_eq!(out.status(), StatusCode::OK);
        assert_eq!(out.headers()[header::CONTENT_TYPE], "application/json");
        let value: serde_json::Value = serde_json::from_str(&body_text(out).await).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"status": "success", "reason": "ok", "object": 42})
        );
    }

    #[tokio::test]
    async fn test_render_yaml_body() {
        let mut resp = GateResponse::new();
        resp.media = Some(Media::success("ok"));

        let out = render(resp, HttpMethod::Post, MediaFormat::Yaml).unwrap();
        assert_eq!(out.headers()[header::CONTENT_TYPE], "application/x-yaml");
        let media: Media = serde_yaml::from_str(&body_text(out).await).unwrap();
        assert_eq!(media, Media::success("ok"));
    }

    #[tokio::test]
    async fn test_render_head_has_no_body() {
        let mut resp = GateResponse::new();
        resp.status = StatusCode::UNAUTHORIZED;
        resp.media = Some(Media::failure());

        let out = render(resp, HttpMethod::Head, MediaFormat::Json).unwrap();
        assert_eq!(out.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(out).await.is_empty());
    }

    #[tokio::test]
    async fn test_render_keeps_handler_headers() {
        let mut resp = GateResponse::new();
        resp.media = Some(Media::success("ok"));
        resp.headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static("text/html"));
        resp.headers
            .insert("x-object-count", HeaderValue::from_static("1"));

        let out = render(resp, HttpMethod::Get, MediaFormat::Json).unwrap();
        assert_eq!(out.headers()[header::CONTENT_TYPE], "text/html");
        assert_eq!(out.headers()["x-object-count"], "1");
    }
}
