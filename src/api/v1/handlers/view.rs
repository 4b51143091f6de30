/*
 * Responsibility
 * - /view: html-only route served by a single generic handler
 */
use crate::services::gate::{GateRequest, GateResponse, Media, RouteGate, handler_fn};

pub fn page() -> RouteGate {
    RouteGate::view()
        .named("view")
        .on_request(handler_fn(|req: &GateRequest, resp: &mut GateResponse| {
            resp.media = Some(Media::success("rendered view").with("path", req.uri.path()));
        }))
}
