//! HTTP codec module for reading requests and writing responses
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestSource`]: the stream-reading capability the parser is written against
//!   - [`BufferedSource`]: buffered source with a native delimiter search ([`DelimiterDecoder`])
//!   - [`ByteSource`]: byte-at-a-time source built on the [`DelimiterScanner`]
//!   - [`RequestParser`]: turns a source into a [`Request`](crate::protocol::Request)
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: normalizes framing headers and writes the exact wire bytes
//!
//! # Example
//!
//! ```no_run
//! use nano_http::codec::{BufferedSource, RequestParser};
//!
//! # async fn demo() -> Result<(), nano_http::protocol::ParseError> {
//! let mut source = BufferedSource::new(&b"GET / HTTP/1.1\r\nHost: h\r\n\r\n"[..]);
//! let request = RequestParser::new().parse(&mut source).await?;
//! assert_eq!(request.path(), "/");
//! # Ok(())
//! # }
//! ```

mod delimiter_scanner;
mod request_parser;
mod request_source;
mod response_encoder;

pub use delimiter_scanner::DelimiterScanner;
pub use request_parser::RequestParser;
pub use request_parser::parse_headers;
pub use request_parser::parse_request_line;
pub use request_source::BufferedSource;
pub use request_source::ByteSource;
pub use request_source::DelimiterDecoder;
pub use request_source::RequestSource;
pub use request_source::SourceMode;
pub use request_source::{CRLF_CRLF, DEFAULT_BUFFER_SIZE, LF};
pub use response_encoder::ResponseEncoder;
pub use response_encoder::normalize_headers;
