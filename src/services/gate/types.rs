/*
 * Responsibility
 * - Request/response views that the gate chain reads and mutates
 * - Media body (status/reason + handler-defined fields)
 * - User / HttpMethod definitions shared by every gate
 */
use std::fmt;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Methods a route gate knows how to dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Self::Get),
            Method::HEAD => Some(Self::Head),
            Method::POST => Some(Self::Post),
            Method::PUT => Some(Self::Put),
            Method::PATCH => Some(Self::Patch),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Name of the dispatch entry point, e.g. `on_get`.
    pub fn entry_name(&self) -> String {
        format!("on_{}", self.as_str())
    }

    /// Name of the business hook, e.g. `execute_on_get`.
    pub fn hook_name(&self) -> String {
        format!("execute_on_{}", self.as_str())
    }

    /// Name used by the skip diagnostic, e.g. `execute_on_get_request`.
    pub fn request_hook_name(&self) -> String {
        format!("execute_on_{}_request", self.as_str())
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound request as seen by the gates.
///
/// Header keys are case-insensitive (`HeaderMap`), values are compared as given.
#[derive(Debug, Clone)]
pub struct GateRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl GateRequest {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Header value as UTF-8 text. Values that are not valid UTF-8 are treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(header_text)
    }
}

/// UTF-8 view of a header value.
///
/// `HeaderValue::to_str` only accepts visible ASCII, but decoded Basic
/// credentials are UTF-8 and get injected back as header values.
pub fn header_text(value: &HeaderValue) -> Option<&str> {
    std::str::from_utf8(value.as_bytes()).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// Structured response body: `{"status": ..., "reason": ..., ...extra}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub status: Outcome,
    pub reason: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Media {
    pub fn failure() -> Self {
        Self {
            status: Outcome::Failure,
            reason: None,
            extra: Map::new(),
        }
    }

    pub fn success(reason: impl Into<String>) -> Self {
        Self {
            status: Outcome::Success,
            reason: Some(reason.into()),
            extra: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Newest reason goes first: `"<new>; <old>"`.
    pub fn update_reason(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        self.reason = Some(match self.reason.take() {
            None => reason,
            Some(old) => format!("{reason}; {old}"),
        });
    }
}

/// Outbound response under construction. Handlers may change any field.
#[derive(Debug, Clone)]
pub struct GateResponse {
    pub status: StatusCode,
    pub media: Option<Media>,
    pub headers: HeaderMap,
}

impl Default for GateResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            media: None,
            headers: HeaderMap::new(),
        }
    }
}

impl GateResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reason(&self) -> Option<&str> {
        self.media.as_ref().and_then(|m| m.reason.as_deref())
    }

    pub fn update_reason(&mut self, reason: impl Into<String>) {
        self.media
            .get_or_insert_with(Media::failure)
            .update_reason(reason);
    }
}

/// Identity returned by a `UserLookup`. The password is the plaintext credential.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
