//! Credential extraction.
//!
//! Two header formats are accepted:
//! - `username` + `password` headers, used as-is
//! - `authorization: <scheme> <base64(user:pass)>`, decoded and copied into
//!   `username`/`password` so later gates read a single place
use std::fmt;

use axum::http::{HeaderMap, HeaderName, HeaderValue, header};
use base64::Engine as _;

use super::error::CredentialError;
use super::types::header_text;

pub const USERNAME: HeaderName = HeaderName::from_static("username");
pub const PASSWORD: HeaderName = HeaderName::from_static("password");

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn extract(headers: &mut HeaderMap) -> Result<Credentials, CredentialError> {
    if headers.contains_key(USERNAME) && headers.contains_key(PASSWORD) {
        let username = owned_text(headers, &USERNAME)?;
        let password = owned_text(headers, &PASSWORD)?;
        return Ok(Credentials { username, password });
    }

    if headers.contains_key(header::AUTHORIZATION) {
        let credentials = decode_authorization(headers)?;
        inject(headers, &credentials)?;
        return Ok(credentials);
    }

    Err(CredentialError::Missing)
}

fn owned_text(headers: &HeaderMap, name: &HeaderName) -> Result<String, CredentialError> {
    headers
        .get(name)
        .and_then(header_text)
        .map(str::to_owned)
        .ok_or(CredentialError::InvalidHeaderValue)
}

fn decode_authorization(headers: &HeaderMap) -> Result<Credentials, CredentialError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(header_text)
        .ok_or(CredentialError::InvalidHeaderValue)?;

    // The scheme is not interpreted; only the shape `<scheme> <payload>` matters.
    let (_scheme, encoded) = value
        .split_once(' ')
        .ok_or(CredentialError::MissingScheme)?;

    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| CredentialError::Base64)?;
    let text = String::from_utf8(decoded).map_err(|_| CredentialError::Utf8)?;

    let (username, password) = text
        .split_once(':')
        .ok_or(CredentialError::MissingSeparator)?;

    Ok(Credentials {
        username: username.to_owned(),
        password: password.to_owned(),
    })
}

fn inject(headers: &mut HeaderMap, credentials: &Credentials) -> Result<(), CredentialError> {
    let username = HeaderValue::from_str(&credentials.username)
        .map_err(|_| CredentialError::InvalidHeaderValue)?;
    let mut password = HeaderValue::from_str(&credentials.password)
        .map_err(|_| CredentialError::InvalidHeaderValue)?;
    password.set_sensitive(true);

    headers.insert(USERNAME, username);
    headers.insert(PASSWORD, password);
    Ok(())
}
