//! Route handler capabilities.
//!
//! A handler receives the parsed [`Request`] and produces a [`Response`]. Two adapters turn
//! plain functions into [`Handler`]s:
//!
//! - [`make_handler`] for suspending (`async`) functions, awaited by the connection worker
//! - [`make_sync_handler`] for synchronous functions, called in place
//!
//! A synchronous handler runs on the connection worker itself; while it runs, nothing else
//! scheduled on the same execution context makes progress.
//!
//! Returning `Err` means the handler did not produce a well-formed response; the connection
//! answers with a 500 instead.

use std::error::Error;
use std::fmt::{Debug, Formatter};
use std::future::Future;

use async_trait::async_trait;
use tracing::debug;

use crate::protocol::{Request, Response};

pub type BoxError = Box<dyn Error + Send + Sync>;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, request: Request) -> Result<Response, BoxError>;
}

/// A suspending function handler, see [`make_handler`].
pub struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut, Err> Handler for HandlerFn<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, Err>> + Send,
    Err: Into<BoxError>,
{
    async fn call(&self, request: Request) -> Result<Response, BoxError> {
        (self.f)(request).await.map_err(Into::into)
    }
}

impl<F> Debug for HandlerFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerFn").field("f", &std::any::type_name::<F>()).finish()
    }
}

pub fn make_handler<F, Fut, Err>(f: F) -> HandlerFn<F>
where
    F: Fn(Request) -> Fut,
    Fut: Future<Output = Result<Response, Err>>,
    Err: Into<BoxError>,
{
    HandlerFn { f }
}

/// A synchronous function handler, see [`make_sync_handler`].
pub struct SyncHandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Err> Handler for SyncHandlerFn<F>
where
    F: Fn(Request) -> Result<Response, Err> + Send + Sync,
    Err: Into<BoxError>,
{
    async fn call(&self, request: Request) -> Result<Response, BoxError> {
        debug!(handler = std::any::type_name::<F>(), "calling handler synchronously, this may block the worker");
        (self.f)(request).map_err(Into::into)
    }
}

impl<F> Debug for SyncHandlerFn<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncHandlerFn").field("f", &std::any::type_name::<F>()).finish()
    }
}

pub fn make_sync_handler<F, Err>(f: F) -> SyncHandlerFn<F>
where
    F: Fn(Request) -> Result<Response, Err>,
    Err: Into<BoxError>,
{
    SyncHandlerFn { f }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Method, ResponseError, StatusCode};
    use std::convert::Infallible;

    async fn echo_path(request: Request) -> Result<Response, Infallible> {
        Ok(Response::ok(request.path()))
    }

    fn teapot(_request: Request) -> Result<Response, ResponseError> {
        Response::new(418, Vec::new(), "")
    }

    fn assert_is_handler<T: Handler>(_handler: &T) {
        // no op
    }

    #[tokio::test]
    async fn async_fn_is_handler() {
        let handler = make_handler(echo_path);
        assert_is_handler(&handler);

        let response = handler.call(Request::builder(Method::Get, "/echo").build()).await.unwrap();
        assert_eq!(response.body(), "/echo");
    }

    #[tokio::test]
    async fn sync_fn_is_handler() {
        let handler = make_sync_handler(|request: Request| Ok::<_, Infallible>(Response::ok(request.method().as_str())));
        assert_is_handler(&handler);

        let response = handler.call(Request::builder(Method::Put, "/").build()).await.unwrap();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), "PUT");
    }

    #[tokio::test]
    async fn handler_error_is_boxed() {
        let handler = make_sync_handler(teapot);

        let error = handler.call(Request::builder(Method::Get, "/").build()).await.unwrap_err();
        assert_eq!(error.to_string(), "http code (418) not implemented");
    }
}
