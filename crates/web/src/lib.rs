//! A micro web server on top of [`nano_http`]: bind an address, accept connections, and
//! serve exactly one request on each of them.
//!
//! ```no_run
//! use std::convert::Infallible;
//!
//! use nano_web::{Method, Request, Response, Router, Server, make_handler};
//!
//! async fn hello(_request: Request) -> Result<Response, Infallible> {
//!     Ok(Response::ok("hello world"))
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let router = Router::new().route(Method::Get, "/hello", make_handler(hello));
//!
//!     let server = Server::builder().router(router).address("127.0.0.1:8080").build().unwrap();
//!     server.start().await.unwrap();
//! }
//! ```

mod config;
mod server;

pub use config::DEFAULT_PORT;
pub use config::ServerConfig;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
pub use server::ServerError;

pub use nano_http::codec::SourceMode;
pub use nano_http::handler::{Handler, make_handler, make_sync_handler};
pub use nano_http::protocol::{Method, Request, Response, StatusCode};
pub use nano_http::router::Router;
