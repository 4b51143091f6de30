//! Request-validation middleware for axum services.
//!
//! Each route is described by a [`services::gate::RouteGate`]: which content
//! types it accepts, whether it needs credentials, which policy authorizes the
//! caller, and which handler serves each HTTP method. [`middleware::gate::route`]
//! mounts a gate on an axum router.
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
