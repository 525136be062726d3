//! Request parsing.
//!
//! [`RequestParser::parse`] consumes one request from a [`RequestSource`]:
//!
//! 1. the request line, read with [`RequestSource::read_line`]
//! 2. the header block, read with [`RequestSource::read_until`] up to `\r\n\r\n`
//! 3. the body, which is never read from the stream and is always empty
//!
//! The request line is split on spaces after every `?` has been replaced by a space, with at
//! most three fields. The third field is the raw remainder of the line: for
//! `GET /foo?x=1 HTTP/1.1` it is `x=1 HTTP/1.1\r\n`, and without a query it is the protocol
//! version. Callers wanting the query must strip the trailing version themselves.

use tracing::debug;

use crate::codec::request_source::CRLF_CRLF;
use crate::codec::RequestSource;
use crate::ensure;
use crate::protocol::{Method, ParseError, Request};

/// Parses requests with a fixed body policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestParser {
    preserve_body: bool,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// With `preserve_body` set, GET and DELETE requests keep any body they carry.
    pub fn with_preserve_body(preserve_body: bool) -> Self {
        Self { preserve_body }
    }

    pub fn preserve_body(&self) -> bool {
        self.preserve_body
    }

    /// Reads and parses one request.
    ///
    /// # Errors
    ///
    /// - [`ParseError::MalformedRequestLine`] if the request line does not split into three
    ///   fields, is not UTF-8 or has an empty path
    /// - [`ParseError::UnsupportedMethod`] / [`ParseError::NotImplementedMethod`] for methods
    ///   outside GET, POST, PUT, DELETE and OPTIONS
    /// - [`ParseError::IncompleteData`] if the stream ends before the header block does
    /// - [`ParseError::Io`] if the transport fails
    pub async fn parse<S>(&self, source: &mut S) -> Result<Request, ParseError>
    where
        S: RequestSource,
    {
        debug!("parsing request");
        let request_line = source.read_line().await?;
        let (method, path, query_string) = parse_request_line(&request_line)?;

        let header_block = source.read_until(CRLF_CRLF).await?;
        let headers = parse_headers(&header_block);

        // body reading is not supported, nothing past the header block is consumed
        let body = String::new();

        Ok(Request::builder(method, path)
            .query_string(query_string)
            .headers(headers)
            .body(body)
            .preserve_body(self.preserve_body)
            .build())
    }
}

/// Splits a request line into method, path and the raw query remainder.
///
/// # Errors
///
/// See [`RequestParser::parse`].
pub fn parse_request_line(line: &[u8]) -> Result<(Method, String, String), ParseError> {
    let line = std::str::from_utf8(line)
        .map_err(|e| ParseError::malformed_request_line(format!("request line is not utf-8: {e}")))?;
    debug!(request_line = line.trim_end(), "received request line");

    let replaced = line.replace('?', " ");
    let mut fields = replaced.splitn(3, ' ');

    let (Some(method), Some(path), Some(query_string)) = (fields.next(), fields.next(), fields.next()) else {
        return Err(ParseError::malformed_request_line(format!(
            "expected method, path and query in {:?}",
            line.trim_end()
        )));
    };

    let method = Method::try_from(method)?;
    ensure!(!path.is_empty(), ParseError::malformed_request_line("empty request path"));

    Ok((method, path.to_string(), query_string.to_string()))
}

/// Splits a header block into `(name, value)` pairs.
///
/// Parsing is best effort per line: blank lines are skipped, and a line without a colon or
/// with an empty name is discarded.
pub fn parse_headers(block: &[u8]) -> Vec<(String, String)> {
    let text = String::from_utf8_lossy(block);
    let mut headers = Vec::new();

    for line in text.split("\r\n") {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                headers.push((name.trim().to_string(), value.trim().to_string()));
            }
            _ => debug!(header_line = line, "discarding malformed header line"),
        }
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BufferedSource, ByteSource};
    use indoc::indoc;

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    async fn parse_buffered(raw: &str) -> Result<Request, ParseError> {
        let mut source = BufferedSource::new(raw.as_bytes());
        RequestParser::new().parse(&mut source).await
    }

    #[tokio::test]
    async fn parse_simple_get() {
        let request = parse_buffered("GET /foo?x=1 HTTP/1.1\r\nHost: h\r\n\r\n").await.unwrap();

        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/foo");
        assert_eq!(request.headers(), &[("Host".to_string(), "h".to_string())]);
        assert_eq!(request.body(), "");
    }

    #[tokio::test]
    async fn query_string_keeps_the_line_remainder() {
        let with_query = parse_buffered("GET /foo?x=1 HTTP/1.1\r\nHost: h\r\n\r\n").await.unwrap();
        assert_eq!(with_query.query_string(), "x=1 HTTP/1.1\r\n");

        let without_query = parse_buffered("GET /foo HTTP/1.1\r\nHost: h\r\n\r\n").await.unwrap();
        assert_eq!(without_query.path(), "/foo");
        assert_eq!(without_query.query_string(), "HTTP/1.1\r\n");
    }

    #[tokio::test]
    async fn parse_from_curl() {
        let raw = crlf(indoc! {r##"
        POST /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##});

        let request = parse_buffered(&raw).await.unwrap();

        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "/index.html");
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.header("host"), Some("127.0.0.1:8080"));
        assert_eq!(request.header("User-Agent"), Some("curl/7.79.1"));
        assert_eq!(request.header("Accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn headers_keep_order_casing_and_duplicates() {
        let raw = crlf(indoc! {r##"
        GET / HTTP/1.1
        x-trace: 1
        Cookie: a=1
        Cookie: b=2

        "##});

        let request = parse_buffered(&raw).await.unwrap();

        let expected = vec![
            ("x-trace".to_string(), "1".to_string()),
            ("Cookie".to_string(), "a=1".to_string()),
            ("Cookie".to_string(), "b=2".to_string()),
        ];
        assert_eq!(request.headers(), expected.as_slice());
    }

    #[tokio::test]
    async fn not_implemented_method() {
        let result = parse_buffered("PATCH /foo HTTP/1.1\r\nHost: h\r\n\r\n").await;
        assert!(matches!(result, Err(ParseError::NotImplementedMethod { method }) if method == "PATCH"));
    }

    #[tokio::test]
    async fn unsupported_method() {
        let result = parse_buffered("FOO /foo HTTP/1.1\r\nHost: h\r\n\r\n").await;
        assert!(matches!(result, Err(ParseError::UnsupportedMethod { method }) if method == "FOO"));
    }

    #[tokio::test]
    async fn malformed_request_line() {
        let result = parse_buffered("GET\r\nHost: h\r\n\r\n").await;
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));

        let result = parse_buffered("GET /\r\nHost: h\r\n\r\n").await;
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));

        let result = parse_buffered("GET  HTTP/1.1\r\nHost: h\r\n\r\n").await;
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));
    }

    #[tokio::test]
    async fn truncated_header_block() {
        let result = parse_buffered("GET / HTTP/1.1\r\nHost: h\r\n").await;
        assert!(matches!(result, Err(ParseError::IncompleteData { .. })));
    }

    #[tokio::test]
    async fn byte_source_parses_the_same() {
        let raw = "DELETE /item?id=7 HTTP/1.1\r\nHost: h\r\nAccept: */*\r\n\r\n";

        let mut byte_source = ByteSource::new(raw.as_bytes());
        let from_bytes = RequestParser::new().parse(&mut byte_source).await.unwrap();
        let from_buffer = parse_buffered(raw).await.unwrap();

        assert_eq!(from_bytes, from_buffer);
        assert_eq!(from_bytes.method(), Method::Delete);
        assert_eq!(from_bytes.path(), "/item");
    }

    #[tokio::test]
    async fn parser_carries_preserve_body() {
        let mut source = BufferedSource::new(&b"GET / HTTP/1.1\r\nHost: h\r\n\r\n"[..]);
        let request = RequestParser::with_preserve_body(true).parse(&mut source).await.unwrap();

        assert!(request.preserve_body());
        assert_eq!(request.body(), "");
    }

    #[test]
    fn header_lines_without_colon_are_discarded() {
        let headers = parse_headers(b"Host: h\r\nbroken line\r\n: no-name\r\n\r\nAccept:*/*\r\n\r\n");

        assert_eq!(headers, vec![("Host".to_string(), "h".to_string()), ("Accept".to_string(), "*/*".to_string())]);
    }

    #[test]
    fn header_value_keeps_inner_colons() {
        let headers = parse_headers(b"Host: 127.0.0.1:8080\r\n\r\n");
        assert_eq!(headers, vec![("Host".to_string(), "127.0.0.1:8080".to_string())]);
    }

    #[test]
    fn request_line_is_not_utf8() {
        let result = parse_request_line(b"GET /\xff HTTP/1.1\r\n");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));
    }
}
