//! Core HTTP protocol types.
//!
//! - [`Method`]: the request methods the server dispatches on
//! - [`StatusCode`]: the fixed set of response codes with their status text
//! - [`Request`]: an immutable parsed request
//! - [`Response`]: a handler-built response, normalized on serialization
//!
//! Errors:
//!
//! - [`ParseError`]: the request bytes could not be turned into a [`Request`]
//! - [`RouteError`]: no route matched, or the route table is empty at startup
//! - [`InvokeError`]: a handler did not produce a response
//! - [`ResponseError`]: a response was constructed with an unsupported status code
//! - [`SendError`]: the response could not be written
//! - [`HttpError`]: top-level error returned by a connection

mod method;
pub use method::Method;

mod status;
pub use status::StatusCode;

mod request;
pub use request::Request;
pub use request::RequestBuilder;

mod response;
pub use response::Response;

mod error;
pub use error::HttpError;
pub use error::InvokeError;
pub use error::ParseError;
pub use error::ResponseError;
pub use error::RouteError;
pub use error::SendError;
