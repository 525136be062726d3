use std::fmt::{Display, Formatter};

use futures::SinkExt;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedWrite;
use tracing::{debug, error, info, trace, warn};

use crate::codec::{RequestParser, RequestSource, ResponseEncoder};
use crate::protocol::{HttpError, InvokeError, Request, Response, RouteError, SendError, StatusCode};
use crate::router::Router;

/// Body sent when a handler fails to produce a response.
pub const BAD_HANDLER_RESULT_BODY: &str = "Internal Server Error: bad response from route";

/// The stages a connection goes through. Every connection ends in [`ConnectionState::Closed`];
/// there is no way back to [`ConnectionState::AwaitingRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    AwaitingRequest,
    Parsing,
    Routing,
    Invoking,
    BuildingResponse,
    Sending,
    Closed,
}

impl Display for ConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AwaitingRequest => "awaiting_request",
            Self::Parsing => "parsing",
            Self::Routing => "routing",
            Self::Invoking => "invoking",
            Self::BuildingResponse => "building_response",
            Self::Sending => "sending",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Serves exactly one request over one connection.
///
/// `HttpConnection` drives a single request/response cycle:
/// - parse a [`Request`] from the [`RequestSource`]
/// - resolve its handler in the [`Router`] and invoke it
/// - write the [`Response`], flush, and shut the writer down
///
/// Parse, routing and handler failures are answered with a 500 or 404 response; only
/// transport failures are returned as errors.
///
/// # Type Parameters
///
/// * `S`: the request source, which decides how request bytes are read
/// * `W`: the async writable stream type
#[derive(Debug)]
pub struct HttpConnection<S, W> {
    source: S,
    framed_write: FramedWrite<W, ResponseEncoder>,
    parser: RequestParser,
    state: ConnectionState,
}

impl<S, W> HttpConnection<S, W>
where
    S: RequestSource,
    W: AsyncWrite + Unpin,
{
    pub fn new(source: S, writer: W) -> Self {
        Self::with_parser(source, writer, RequestParser::new())
    }

    pub fn with_parser(source: S, writer: W, parser: RequestParser) -> Self {
        Self {
            source,
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
            parser,
            state: ConnectionState::AwaitingRequest,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub async fn process(mut self, router: &Router) -> Result<(), HttpError> {
        self.transition(ConnectionState::Parsing);
        let response = match self.parser.parse(&mut self.source).await {
            Ok(request) => self.dispatch(request, router).await,
            Err(e) if e.is_io() => {
                error!(cause = %e, "can't read request");
                self.transition(ConnectionState::Closed);
                return Err(e.into());
            }
            Err(e) => {
                warn!(cause = %e, "can't parse request");
                Response::with_body(StatusCode::InternalServerError, e.to_string())
            }
        };

        self.transition(ConnectionState::BuildingResponse);
        let status = response.status();

        self.transition(ConnectionState::Sending);
        let result = self.send_response(response).await;
        self.transition(ConnectionState::Closed);

        match &result {
            Ok(()) => info!(%status, "response sent, client disconnected"),
            Err(e) => error!(%status, cause = %e, "can't send response"),
        }
        result.map_err(Into::into)
    }

    async fn dispatch(&mut self, request: Request, router: &Router) -> Response {
        self.transition(ConnectionState::Routing);
        let method = request.method();
        let handler = match router.resolve(method, request.path()) {
            Ok(handler) => handler,
            Err(e @ RouteError::NotFound { .. }) => {
                warn!(cause = %e, "no route found");
                return Response::with_status(StatusCode::NotFound);
            }
            Err(e) => {
                error!(cause = %e, "routing failed");
                return Response::with_status(StatusCode::InternalServerError);
            }
        };
        debug!(%method, path = request.path(), "found route");

        self.transition(ConnectionState::Invoking);
        match handler.call(request).await {
            Ok(response) => response,
            Err(e) => {
                let e = InvokeError::bad_handler_result(e);
                error!(cause = %e, "handler did not return a response");
                Response::with_body(StatusCode::InternalServerError, BAD_HANDLER_RESULT_BODY)
            }
        }
    }

    async fn send_response(&mut self, response: Response) -> Result<(), SendError> {
        // send() encodes and flushes
        self.framed_write.send(response).await?;
        self.framed_write.get_mut().shutdown().await.map_err(SendError::io)
    }

    fn transition(&mut self, next: ConnectionState) {
        trace!(from = %self.state, to = %next, "connection state");
        self.state = next;
    }
}
