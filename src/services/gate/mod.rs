//! Pre-dispatch request validation.
//!
//! A `RouteGate` runs the content-type, credential, authentication and
//! authorization gates in a fixed order and only then hands the request to the
//! handler registered for its method.
pub mod auth;
pub mod content_type;
pub mod core;
pub mod credentials;
pub mod error;
pub mod handler;
pub mod types;

pub use auth::{
    AllowAuthenticated, DenyAll, PasswordComparison, RoutePolicy, UserLookup, policy_fn,
};
pub use content_type::AllowedContentTypes;
pub use self::core::{Dispatch, GateState, RouteGate, Stage};
pub use credentials::Credentials;
pub use error::{CredentialError, GateError};
pub use handler::{Handler, handler_fn};
pub use types::{GateRequest, GateResponse, HttpMethod, Media, Outcome, User};
