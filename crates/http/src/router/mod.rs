//! Exact-match request routing.
//!
//! The [`Router`] is an append-only list of `(method, path, handler)` entries. Lookup is a
//! linear scan in registration order and returns the first entry whose method and path
//! are equal to the request's: no wildcards, no trailing-slash or case normalization.
//!
//! # Preconditions
//!
//! All routes must be registered before the server starts accepting connections. Once
//! serving, the router is shared read-only by every connection worker; registration needs
//! `&mut Router`, so routes cannot be added while it is shared.

use std::convert::Infallible;
use std::fmt::{Debug, Formatter};

use tracing::{debug, trace};

use crate::handler::{Handler, make_handler};
use crate::protocol::{Method, Request, Response, RouteError};

/// Body of the response served by [`Router::add_default_route`].
pub const DEFAULT_ROUTE_BODY: &str = "200 OK";

pub struct RouteEntry {
    method: Method,
    path: String,
    handler: Box<dyn Handler>,
}

impl RouteEntry {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    fn matches(&self, method: Method, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

impl Debug for RouteEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEntry").field("method", &self.method).field("path", &self.path).finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route. Duplicate `(method, path)` pairs are allowed; the earliest wins.
    pub fn register(&mut self, method: Method, path: impl Into<String>, handler: impl Handler + 'static) -> &mut Self {
        let path = path.into();
        debug!(%method, %path, "registering route");
        self.routes.push(RouteEntry { method, path, handler: Box::new(handler) });
        self
    }

    /// Builder-style [`register`](Router::register).
    #[must_use]
    pub fn route(mut self, method: Method, path: impl Into<String>, handler: impl Handler + 'static) -> Self {
        self.register(method, path, handler);
        self
    }

    /// Registers `GET /` answering `200 OK`.
    pub fn add_default_route(&mut self) -> &mut Self {
        self.register(Method::Get, "/", make_handler(default_route))
    }

    /// Finds the handler of the first route registered for `method` and `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NotFound`] if no route matches.
    pub fn resolve(&self, method: Method, path: &str) -> Result<&dyn Handler, RouteError> {
        self.routes
            .iter()
            .find(|entry| entry.matches(method, path))
            .map(|entry| {
                trace!(%method, path, "route matched");
                entry.handler()
            })
            .ok_or_else(|| RouteError::not_found(method, path))
    }

    /// Checks the startup precondition that at least one route exists.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::NoRoutesRegistered`] if the table is empty.
    pub fn ensure_routes(&self) -> Result<(), RouteError> {
        if self.routes.is_empty() { Err(RouteError::NoRoutesRegistered) } else { Ok(()) }
    }

    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

async fn default_route(_request: Request) -> Result<Response, Infallible> {
    Ok(Response::ok(DEFAULT_ROUTE_BODY))
}
