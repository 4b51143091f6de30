/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - gated routes は middleware::gate::route で RouteGate を mount する
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, objects, view};
use crate::middleware::gate;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let limit = state.body_limit_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/objects", gate::route(objects::authenticated(state), limit))
        .route(
            "/objects/unimplemented",
            gate::route(objects::authenticated_unimplemented(state), limit),
        )
        .route("/open/objects", gate::route(objects::open(), limit))
        .route(
            "/open/unimplemented",
            gate::route(objects::open_unimplemented(), limit),
        )
        .route("/view", gate::route(view::page(), limit))
}
