//! Failures a gate can report.
//!
//! None of these escape the dispatcher: each one is converted into a response
//! status, a reason and a cleared `allowed_to_execute` flag.
use axum::http::StatusCode;
use thiserror::Error;

use super::content_type::AllowedContentTypes;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("content-type is not in {allowed}")]
    UnsupportedContentType { allowed: AllowedContentTypes },

    #[error("credential format is invalid")]
    CredentialFormatInvalid(#[from] CredentialError),

    #[error("Invalid credentials for this request, user doesn't exist")]
    UserNotFound,

    #[error("Invalid credentials for this request, password is wrong")]
    PasswordMismatch,

    #[error("Valid user and password, but invalid authorization for this request")]
    AuthorizationDenied,

    #[error("{hook} not implemented for this URL path")]
    HandlerNotImplemented { hook: String },
}

impl GateError {
    pub fn status(&self) -> StatusCode {
        match self {
            GateError::UnsupportedContentType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            GateError::CredentialFormatInvalid(_) => StatusCode::BAD_REQUEST,
            GateError::UserNotFound
            | GateError::PasswordMismatch
            | GateError::AuthorizationDenied => StatusCode::UNAUTHORIZED,
            GateError::HandlerNotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

/// Why no credential pair could be read from the headers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("neither username/password nor authorization header present")]
    Missing,
    #[error("authorization header is not `<scheme> <credentials>`")]
    MissingScheme,
    #[error("authorization credentials are not valid base64")]
    Base64,
    #[error("authorization credentials are not valid utf-8")]
    Utf8,
    #[error("authorization credentials have no `:` separator")]
    MissingSeparator,
    #[error("decoded credentials cannot be stored as header values")]
    InvalidHeaderValue,
}

impl CredentialError {
    /// Any failure after the authorization header was found.
    pub fn is_malformed_encoding(&self) -> bool {
        !matches!(self, CredentialError::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GateError::CredentialFormatInvalid(CredentialError::Missing).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(GateError::UserNotFound.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(GateError::PasswordMismatch.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(GateError::AuthorizationDenied.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            GateError::HandlerNotImplemented {
                hook: "execute_on_get".into()
            }
            .status(),
            StatusCode::NOT_IMPLEMENTED
        );
    }

    #[test]
    fn test_credential_errors_share_one_reason() {
        for err in [
            CredentialError::Missing,
            CredentialError::Base64,
            CredentialError::MissingSeparator,
        ] {
            assert_eq!(
                GateError::from(err).to_string(),
                "credential format is invalid"
            );
        }
    }

    #[test]
    fn test_not_implemented_reason() {
        let err = GateError::HandlerNotImplemented {
            hook: "execute_on_put".into(),
        };
        assert_eq!(
            err.to_string(),
            "execute_on_put not implemented for this URL path"
        );
    }

    #[test]
    fn test_malformed_encoding_classification() {
        assert!(!CredentialError::Missing.is_malformed_encoding());
        assert!(CredentialError::Utf8.is_malformed_encoding());
    }
}
