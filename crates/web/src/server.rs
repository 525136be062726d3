use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use nano_http::codec::{BufferedSource, ByteSource, RequestParser, SourceMode};
use nano_http::connection::HttpConnection;
use nano_http::protocol::{HttpError, RouteError};
use nano_http::router::Router;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument, error, info, info_span, warn};

use crate::ServerConfig;

#[derive(Debug)]
pub struct ServerBuilder {
    router: Option<Router>,
    address: Option<io::Result<Vec<SocketAddr>>>,
    config: ServerConfig,
    dispatch: Option<Dispatch>,
}

impl ServerBuilder {
    fn new() -> Self {
        Self { router: None, address: None, config: ServerConfig::default(), dispatch: None }
    }

    /// Sets the listening address; defaults to `0.0.0.0:80`.
    #[must_use]
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        self.address = Some(address.to_socket_addrs().map(Iterator::collect));
        self
    }

    /// Sets the route table. It can't be changed once the server is built.
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    #[must_use]
    pub fn preserve_body(mut self, preserve_body: bool) -> Self {
        self.config.set_preserve_body(preserve_body);
        self
    }

    #[must_use]
    pub fn source_mode(mut self, source_mode: SourceMode) -> Self {
        self.config.set_source_mode(source_mode);
        self
    }

    #[must_use]
    pub fn read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.config.set_read_buffer_size(read_buffer_size);
        self
    }

    /// Runs every connection worker under `dispatch` instead of the caller's default subscriber.
    #[must_use]
    pub fn dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn build(self) -> Result<Server, ServerBuildError> {
        let router = self.router.ok_or(ServerBuildError::MissingRouter)?;

        let mut config = self.config;
        match self.address {
            None => {}
            Some(Ok(addresses)) if addresses.is_empty() => {
                return Err(ServerBuildError::invalid_address("address resolved to nothing"));
            }
            Some(Ok(addresses)) => config.set_addresses(addresses),
            Some(Err(e)) => return Err(ServerBuildError::invalid_address(e)),
        }

        Ok(Server { router: Arc::new(router), config, dispatch: self.dispatch })
    }
}

#[derive(Error, Debug)]
pub enum ServerBuildError {
    #[error("router must be set")]
    MissingRouter,
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },
}

impl ServerBuildError {
    fn invalid_address<S: ToString>(reason: S) -> Self {
        Self::InvalidAddress { reason: reason.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("server can't start: {source}")]
    Route {
        #[from]
        source: RouteError,
    },
    #[error("bind server error: {source}")]
    Bind { source: io::Error },
}

/// Accepts connections and serves one request on each.
///
/// Every accepted connection gets its own worker task; run the server on a
/// `current_thread` runtime to keep all workers on a single execution context.
///
/// The server never installs a global tracing subscriber: the caller owns it, or injects
/// one for the workers with [`ServerBuilder::dispatch`].
#[derive(Debug)]
pub struct Server {
    router: Arc<Router>,
    config: ServerConfig,
    dispatch: Option<Dispatch>,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Binds the configured address and serves forever.
    ///
    /// # Errors
    ///
    /// Fails before binding with [`RouteError::NoRoutesRegistered`] if the router is empty,
    /// or with [`ServerError::Bind`] if no address can be bound.
    pub async fn start(self) -> Result<(), ServerError> {
        self.router.ensure_routes()?;

        let tcp_listener = match TcpListener::bind(self.config.addresses()).await {
            Ok(tcp_listener) => tcp_listener,
            Err(e) => {
                error!(cause = %e, "bind server error");
                return Err(ServerError::Bind { source: e });
            }
        };

        self.serve(tcp_listener).await
    }

    /// Serves forever on an already bound listener.
    ///
    /// # Errors
    ///
    /// Fails with [`RouteError::NoRoutesRegistered`] before accepting anything if the
    /// router is empty.
    pub async fn serve(self, tcp_listener: TcpListener) -> Result<(), ServerError> {
        self.router.ensure_routes()?;
        info!(address = ?tcp_listener.local_addr().ok(), routes = self.router.len(), "start listening");

        loop {
            let (tcp_stream, remote_addr) = match tcp_listener.accept().await {
                Ok(stream_and_addr) => stream_and_addr,
                Err(e) => {
                    warn!(cause = %e, "failed to accept");
                    continue;
                }
            };

            let worker = Worker {
                router: Arc::clone(&self.router),
                parser: RequestParser::with_preserve_body(self.config.preserve_body()),
                source_mode: self.config.source_mode(),
                read_buffer_size: self.config.read_buffer_size(),
            };

            let task = async move {
                let span = info_span!("connection", peer = %remote_addr);
                worker.run(tcp_stream).instrument(span).await;
            };

            match &self.dispatch {
                Some(dispatch) => tokio::spawn(task.with_subscriber(dispatch.clone())),
                None => tokio::spawn(task),
            };
        }
    }
}

/// What a connection task needs from the server.
#[derive(Debug)]
struct Worker {
    router: Arc<Router>,
    parser: RequestParser,
    source_mode: SourceMode,
    read_buffer_size: usize,
}

impl Worker {
    async fn run(self, tcp_stream: TcpStream) {
        match self.process(tcp_stream).await {
            Ok(()) => info!("finished process, connection shutdown"),
            Err(e) => error!("service has error, cause {}, connection shutdown", e),
        }
    }

    async fn process(self, tcp_stream: TcpStream) -> Result<(), HttpError> {
        let (reader, writer) = tcp_stream.into_split();
        match self.source_mode {
            SourceMode::Buffered => {
                let source = BufferedSource::with_capacity(reader, self.read_buffer_size);
                HttpConnection::with_parser(source, writer, self.parser).process(&self.router).await
            }
            SourceMode::ByteByByte => {
                let source = ByteSource::new(reader);
                HttpConnection::with_parser(source, writer, self.parser).process(&self.router).await
            }
        }
    }
}
