/*
 * Responsibility
 * - Per-route content-type allow list
 * - Substring match of the `content-type` header against the list
 */
use std::borrow::Cow;
use std::fmt;

use axum::http::{HeaderMap, header};

use super::error::GateError;
use super::types::header_text;

/// Ordered list of substrings a request's `content-type` must contain one of.
///
/// Matching is case-sensitive against the header value as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedContentTypes(Vec<Cow<'static, str>>);

impl AllowedContentTypes {
    pub fn new<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cow<'static, str>>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    /// Services and views combined.
    pub fn base() -> Self {
        Self::new(["json", "yaml", "html"])
    }

    /// Machine-facing routes.
    pub fn service() -> Self {
        Self::new(["json", "yaml"])
    }

    /// Pure view routes.
    pub fn view() -> Self {
        Self::new(["html"])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|t| t.as_ref())
    }

    pub fn matches(&self, content_type: &str) -> bool {
        self.iter().any(|allowed| content_type.contains(allowed))
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), GateError> {
        let allowed = headers
            .get(header::CONTENT_TYPE)
            .and_then(header_text)
            .is_some_and(|ct| self.matches(ct));

        if allowed {
            Ok(())
        } else {
            Err(GateError::UnsupportedContentType {
                allowed: self.clone(),
            })
        }
    }
}

impl Default for AllowedContentTypes {
    fn default() -> Self {
        Self::base()
    }
}

// Rendered as `['json', 'yaml']` inside failure reasons.
impl fmt::Display for AllowedContentTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{t}'")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn test_substring_match_passes() {
        let allowed = AllowedContentTypes::service();
        assert!(allowed.check(&headers_with("application/json")).is_ok());
        assert!(
            allowed
                .check(&headers_with("application/json; charset=utf-8"))
                .is_ok()
        );
        assert!(allowed.check(&headers_with("text/yaml")).is_ok());
    }

    #[test]
    fn test_unlisted_type_fails_with_415() {
        let allowed = AllowedContentTypes::service();
        let err = allowed.check(&headers_with("application/xml")).unwrap_err();
        assert_eq!(err.status().as_u16(), 415);
        assert_eq!(err.to_string(), "content-type is not in ['json', 'yaml']");
    }

    #[test]
    fn test_missing_header_fails() {
        let allowed = AllowedContentTypes::base();
        let err = allowed.check(&HeaderMap::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "content-type is not in ['json', 'yaml', 'html']"
        );
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let allowed = AllowedContentTypes::service();
        assert!(allowed.check(&headers_with("application/JSON")).is_err());
    }

    #[test]
    fn test_view_only_allows_html() {
        let allowed = AllowedContentTypes::view();
        assert!(allowed.check(&headers_with("text/html")).is_ok());
        assert!(allowed.check(&headers_with("application/json")).is_err());
    }

    #[test]
    fn test_custom_list_display() {
        let allowed = AllowedContentTypes::new(vec![String::from("csv")]);
        assert_eq!(allowed.to_string(), "['csv']");
    }
}
