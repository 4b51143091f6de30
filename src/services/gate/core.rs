//! Gate chain and method dispatch - core logic.
//!
//! This module does not know about axum routing or body encoding; the
//! `middleware::gate` adapter builds a `GateRequest`, calls `RouteGate::dispatch`
//! and renders the resulting `GateResponse`.
//!
//! Order per request (never reordered):
//! content-type -> credentials -> authentication -> authorization
//! -> generic `on_request` handler -> method handler.
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::auth::{self, DenyAll, PasswordComparison, RoutePolicy, UserLookup};
use super::content_type::AllowedContentTypes;
use super::credentials;
use super::error::GateError;
use super::handler::{Handler, MethodHandlers};
use super::types::{GateRequest, GateResponse, HttpMethod, Media};

/// Position of a request in the gate chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    ContentTypeChecked,
    CredentialsExtracted,
    Authenticated,
    Authorized,
    Dispatched,
    Rejected,
}

/// Per-request gate state. Lives on the stack of one `RouteGate::run` call.
#[derive(Debug, Clone, Copy)]
pub struct GateState {
    allowed_to_execute: bool,
    stage: Stage,
}

impl Default for GateState {
    fn default() -> Self {
        Self {
            allowed_to_execute: true,
            stage: Stage::Start,
        }
    }
}

impl GateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allowed_to_execute(&self) -> bool {
        self.allowed_to_execute
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        // Rejected is absorbing.
        if self.allowed_to_execute {
            debug!(from = ?self.stage, to = ?stage, "gate stage");
            self.stage = stage;
        }
    }

    fn reject(&mut self) {
        self.allowed_to_execute = false;
        self.stage = Stage::Rejected;
    }
}

/// Result of running one request through a route gate.
#[derive(Debug)]
pub struct Dispatch {
    pub response: GateResponse,
    pub state: GateState,
}

/// One configured validation pipeline, typically one per URL path.
///
/// Built once at startup and shared behind `Arc`; nothing in here changes per request.
pub struct RouteGate {
    name: Cow<'static, str>,
    content_types: AllowedContentTypes,
    lookup: Option<Arc<dyn UserLookup>>,
    policy: Arc<dyn RoutePolicy>,
    comparison: PasswordComparison,
    handlers: MethodHandlers,
    on_request: Option<Arc<dyn Handler>>,
}

impl RouteGate {
    pub fn new(content_types: AllowedContentTypes) -> Self {
        Self {
            name: Cow::Borrowed("route"),
            content_types,
            lookup: None,
            policy: Arc::new(DenyAll),
            comparison: PasswordComparison::default(),
            handlers: MethodHandlers::default(),
            on_request: None,
        }
    }

    /// json, yaml or html.
    pub fn base() -> Self {
        Self::new(AllowedContentTypes::base())
    }

    /// json or yaml.
    pub fn service() -> Self {
        Self::new(AllowedContentTypes::service())
    }

    /// html only.
    pub fn view() -> Self {
        Self::new(AllowedContentTypes::view())
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn content_types(mut self, content_types: AllowedContentTypes) -> Self {
        self.content_types = content_types;
        self
    }

    /// Require credentials on this route. Without a policy every user is denied.
    pub fn authenticate_with(mut self, lookup: Arc<dyn UserLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn authorize_with(mut self, policy: impl RoutePolicy + 'static) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    pub fn password_comparison(mut self, comparison: PasswordComparison) -> Self {
        self.comparison = comparison;
        self
    }

    pub fn on(mut self, method: HttpMethod, handler: impl Handler + 'static) -> Self {
        self.handlers.insert(method, Arc::new(handler));
        self
    }

    /// Same handler for several methods.
    pub fn on_each(mut self, methods: &[HttpMethod], handler: Arc<dyn Handler>) -> Self {
        for method in methods {
            self.handlers.insert(*method, handler.clone());
        }
        self
    }

    /// Generic handler run for every method once all gates have passed, before
    /// the method handler. A method without its own handler is then served by
    /// this one alone instead of answering 501.
    pub fn on_request(mut self, handler: impl Handler + 'static) -> Self {
        self.on_request = Some(Arc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requires_auth(&self) -> bool {
        self.lookup.is_some()
    }

    pub async fn dispatch(&self, method: HttpMethod, req: GateRequest) -> GateResponse {
        self.run(method, req).await.response
    }

    pub async fn run(&self, method: HttpMethod, mut req: GateRequest) -> Dispatch {
        let mut state = GateState::new();
        let mut resp = GateResponse::new();
        // Assume failure until a handler says otherwise.
        resp.media = Some(Media::failure());

        match self.content_types.check(&req.headers) {
            Ok(()) => state.advance(Stage::ContentTypeChecked),
            Err(err) => self.reject(&mut state, &mut resp, err),
        }

        if state.allowed_to_execute()
            && let Some(lookup) = &self.lookup
        {
            self.check_credentials(lookup.as_ref(), &mut req, &mut state, &mut resp)
                .await;
        }

        let mut generic_ran = false;
        if state.allowed_to_execute()
            && let Some(handler) = &self.on_request
        {
            handler.call(&req, &mut resp).await;
            generic_ran = true;
        }

        self.dispatch_method(method, &req, generic_ran, &mut state, &mut resp)
            .await;

        Dispatch {
            response: resp,
            state,
        }
    }

    async fn check_credentials(
        &self,
        lookup: &dyn UserLookup,
        req: &mut GateRequest,
        state: &mut GateState,
        resp: &mut GateResponse,
    ) {
        let credentials = match credentials::extract(&mut req.headers) {
            Ok(credentials) => credentials,
            Err(err) => {
                debug!(
                    route = %self.name,
                    error = %err,
                    malformed = err.is_malformed_encoding(),
                    "credential extraction failed"
                );
                return self.reject(state, resp, err.into());
            }
        };
        state.advance(Stage::CredentialsExtracted);

        let user = match auth::authenticate(lookup, self.comparison, req, &credentials).await {
            Ok(user) => user,
            Err(err) => return self.reject(state, resp, err),
        };
        state.advance(Stage::Authenticated);

        match auth::authorize(self.policy.as_ref(), req, &user).await {
            Ok(()) => state.advance(Stage::Authorized),
            Err(err) => self.reject(state, resp, err),
        }
    }

    async fn dispatch_method(
        &self,
        method: HttpMethod,
        req: &GateRequest,
        generic_ran: bool,
        state: &mut GateState,
        resp: &mut GateResponse,
    ) {
        if !state.allowed_to_execute() {
            resp.update_reason(format!(
                "In {} function: exiting before running {}",
                method.entry_name(),
                method.request_hook_name()
            ));
            return;
        }

        match self.handlers.get(method) {
            Some(handler) => handler.call(req, resp).await,
            None if generic_ran => {}
            None => {
                let err = GateError::HandlerNotImplemented {
                    hook: method.hook_name(),
                };
                info!(route = %self.name, %method, "{err}");
                resp.status = err.status();
                // HEAD responses carry no body.
                resp.media = match method {
                    HttpMethod::Head => None,
                    _ => {
                        let mut media = Media::failure();
                        media.update_reason(err.to_string());
                        Some(media)
                    }
                };
            }
        }

        state.advance(Stage::Dispatched);
    }

    fn reject(&self, state: &mut GateState, resp: &mut GateResponse, err: GateError) {
        warn!(
            route = %self.name,
            stage = ?state.stage(),
            status = err.status().as_u16(),
            reason = %err,
            "request rejected"
        );
        state.reject();
        resp.status = err.status();
        resp.update_reason(err.to_string());
    }
}

impl fmt::Debug for RouteGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGate")
            .field("name", &self.name)
            .field("content_types", &self.content_types)
            .field("requires_auth", &self.requires_auth())
            .field("comparison", &self.comparison)
            .field("handlers", &self.handlers)
            .field("on_request", &self.on_request.is_some())
            .finish()
    }
}
