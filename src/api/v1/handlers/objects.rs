/*
 * Responsibility
 * - /objects 系の RouteGate 組み立て (auth あり / なし, handler あり / なし)
 * - Handler は gate を全て通過した後にだけ呼ばれる
 */
use std::sync::Arc;

use async_trait::async_trait;

use crate::services::gate::{
    AllowAuthenticated, GateRequest, GateResponse, Handler, HttpMethod, Media, RouteGate,
};
use crate::state::AppState;

/// Answers every method with a fixed object.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectHandler;

#[async_trait]
impl Handler for ObjectHandler {
    async fn call(&self, req: &GateRequest, resp: &mut GateResponse) {
        let method = HttpMethod::from_method(&req.method)
            .map(|m| m.as_str())
            .unwrap_or("request");

        resp.media = Some(
            Media::success(format!("executed on_{method} completely")).with("object", 42),
        );
    }
}

fn authenticated_gate(state: &AppState, name: &'static str) -> RouteGate {
    RouteGate::service()
        .named(name)
        .authenticate_with(state.users.clone())
        .authorize_with(AllowAuthenticated)
        .password_comparison(state.password_comparison)
}

fn with_object_handler(gate: RouteGate) -> RouteGate {
    gate.on_each(&HttpMethod::ALL, Arc::new(ObjectHandler))
}

/// `/objects`: credentials required, every method implemented.
pub fn authenticated(state: &AppState) -> RouteGate {
    with_object_handler(authenticated_gate(state, "objects"))
}

/// `/objects/unimplemented`: credentials required, no handlers.
pub fn authenticated_unimplemented(state: &AppState) -> RouteGate {
    authenticated_gate(state, "objects_unimplemented")
}

/// `/open/objects`: no credentials, every method implemented.
pub fn open() -> RouteGate {
    with_object_handler(RouteGate::service().named("open_objects"))
}

/// `/open/unimplemented`: no credentials, no handlers.
pub fn open_unimplemented() -> RouteGate {
    RouteGate::service().named("open_unimplemented")
}
