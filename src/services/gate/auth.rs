/*
 * Responsibility
 * - Authentication: resolve a User for the request and compare passwords
 * - Authorization: apply the route policy to an authenticated User
 * - Collaborator seams (UserLookup / RoutePolicy) implemented by the embedding app
 */
use std::str::FromStr;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use super::credentials::Credentials;
use super::error::GateError;
use super::types::{GateRequest, User};

/// Identity lookup. May perform I/O (database, directory, ...).
///
/// Called after credential extraction, so `username`/`password` headers are
/// always present on `req`.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn get_user(&self, req: &GateRequest) -> Option<User>;
}

/// Per-route authorization decision for an already authenticated user.
#[async_trait]
pub trait RoutePolicy: Send + Sync {
    async fn valid_credentials_for_route(&self, _req: &GateRequest, _user: &User) -> bool {
        false
    }
}

/// Default policy: nobody is authorized until the route says otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

#[async_trait]
impl RoutePolicy for DenyAll {}

/// Any user that passed authentication is authorized.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAuthenticated;

#[async_trait]
impl RoutePolicy for AllowAuthenticated {
    async fn valid_credentials_for_route(&self, _req: &GateRequest, _user: &User) -> bool {
        true
    }
}

/// Synchronous predicate used as a route policy.
pub struct PolicyFn<F>(F);

pub fn policy_fn<F>(f: F) -> PolicyFn<F>
where
    F: Fn(&GateRequest, &User) -> bool + Send + Sync,
{
    PolicyFn(f)
}

#[async_trait]
impl<F> RoutePolicy for PolicyFn<F>
where
    F: Fn(&GateRequest, &User) -> bool + Send + Sync,
{
    async fn valid_credentials_for_route(&self, req: &GateRequest, user: &User) -> bool {
        (self.0)(req, user)
    }
}

/// How the supplied password is compared with the stored one.
///
/// `Plaintext` is plain string equality and leaks timing information. `Digest`
/// hashes both sides with SHA-256 and compares the digests in constant time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordComparison {
    #[default]
    Plaintext,
    Digest,
}

impl PasswordComparison {
    pub fn matches(&self, supplied: &str, stored: &str) -> bool {
        match self {
            PasswordComparison::Plaintext => supplied == stored,
            PasswordComparison::Digest => {
                let a = Sha256::digest(supplied.as_bytes());
                let b = Sha256::digest(stored.as_bytes());
                a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
            }
        }
    }
}

impl FromStr for PasswordComparison {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" | "plain" => Ok(Self::Plaintext),
            "digest" | "sha256" => Ok(Self::Digest),
            _ => Err(()),
        }
    }
}

pub async fn authenticate(
    lookup: &dyn UserLookup,
    comparison: PasswordComparison,
    req: &GateRequest,
    credentials: &Credentials,
) -> Result<User, GateError> {
    let user = lookup
        .get_user(req)
        .await
        .ok_or(GateError::UserNotFound)?;

    if !comparison.matches(&credentials.password, &user.password) {
        return Err(GateError::PasswordMismatch);
    }

    Ok(user)
}

pub async fn authorize(
    policy: &dyn RoutePolicy,
    req: &GateRequest,
    user: &User,
) -> Result<(), GateError> {
    if policy.valid_credentials_for_route(req, user).await {
        Ok(())
    } else {
        Err(GateError::AuthorizationDenied)
    }
}
