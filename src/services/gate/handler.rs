//! Business handlers registered on a route gate.
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::types::{GateRequest, GateResponse, HttpMethod};

/// Business logic for one method (or for every request, see `RouteGate::on_request`).
///
/// Only called once every gate has passed. The handler owns the response from
/// that point: status, media and headers are all its to change.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: &GateRequest, resp: &mut GateResponse);
}

/// Synchronous closure used as a handler.
pub struct HandlerFn<F>(F);

pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&GateRequest, &mut GateResponse) + Send + Sync,
{
    HandlerFn(f)
}

#[async_trait]
impl<F> Handler for HandlerFn<F>
where
    F: Fn(&GateRequest, &mut GateResponse) + Send + Sync,
{
    async fn call(&self, req: &GateRequest, resp: &mut GateResponse) {
        (self.0)(req, resp)
    }
}

/// At most one handler per method; a missing entry means "not implemented".
#[derive(Clone, Default)]
pub struct MethodHandlers(HashMap<HttpMethod, Arc<dyn Handler>>);

impl MethodHandlers {
    pub fn insert(&mut self, method: HttpMethod, handler: Arc<dyn Handler>) {
        self.0.insert(method, handler);
    }

    pub fn get(&self, method: HttpMethod) -> Option<&Arc<dyn Handler>> {
        self.0.get(&method)
    }
}

impl std::fmt::Debug for MethodHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut methods: Vec<&'static str> = self.0.keys().map(HttpMethod::as_str).collect();
        methods.sort_unstable();
        f.debug_tuple("MethodHandlers").field(&methods).finish()
    }
}
