//! A minimal embeddable HTTP/1.1 protocol core
//!
//! This crate parses one request per connection, dispatches it to a handler registered for
//! the exact method and path, and writes back a response with correct framing headers. It
//! is meant for small runtimes: the request parser only needs a "read line" and a
//! "read until delimiter" capability, and the latter can be synthesized one byte at a time.
//!
//! # Example
//!
//! ```no_run
//! use std::convert::Infallible;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use tracing::{error, info, warn};
//! use nano_http::codec::BufferedSource;
//! use nano_http::connection::HttpConnection;
//! use nano_http::handler::make_handler;
//! use nano_http::protocol::{Method, Request, Response};
//! use nano_http::router::Router;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let router = Arc::new(Router::new().route(Method::Get, "/hello", make_handler(hello_world)));
//!
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:8080").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let router = Arc::clone(&router);
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(BufferedSource::new(reader), writer);
//!             if let Err(e) = connection.process(&router).await {
//!                 error!("connection failed, cause {}", e);
//!             }
//!         });
//!     }
//! }
//!
//! async fn hello_world(request: Request) -> Result<Response, Infallible> {
//!     info!(path = request.path(), "hello");
//!     Ok(Response::ok("Hello World!"))
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request, response, method, status and error types
//! - [`codec`]: request sources, the delimiter scanner, the request parser and the
//!   response encoder
//! - [`handler`]: the route handler capability and function adapters
//! - [`router`]: exact-match route table
//! - [`connection`]: the per-connection request/response cycle
//!
//! # Limitations
//!
//! - one request per connection, always `Connection: close`
//! - request bodies are never read
//! - no chunked transfer encoding, no TLS, no query or form decoding
//! - no read timeouts

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod router;

mod utils;
pub(crate) use utils::ensure;
