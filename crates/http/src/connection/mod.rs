//! HTTP connection handling module
//!
//! One accepted connection carries exactly one request and one response:
//!
//! ```text
//! AwaitingRequest -> Parsing -> Routing -> Invoking -> BuildingResponse -> Sending -> Closed
//! ```
//!
//! - a parse failure skips routing and invocation and is answered with a 500 whose body
//!   describes the failure
//! - an unmatched route is answered with an empty 404
//! - a handler error is answered with a 500
//!
//! There is no keep-alive: the writer is shut down after the response is flushed. Reads
//! have no timeout, so a client that never finishes its request holds its worker until it
//! disconnects.

mod http_connection;

pub use http_connection::BAD_HANDLER_RESULT_BODY;
pub use http_connection::ConnectionState;
pub use http_connection::HttpConnection;
