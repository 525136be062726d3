//! HTTP response representation.
//!
//! A [`Response`] is built by handler code and consumed once by the
//! [`ResponseEncoder`](crate::codec::ResponseEncoder). The framing headers
//! (`Content-Type`, `Content-Length`, `Connection`) are normalized at serialization
//! time, so callers only supply what they care about.

use bytes::Bytes;

use crate::codec::ResponseEncoder;
use crate::protocol::{ResponseError, StatusCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: String,
}

impl Response {
    /// Creates a response from a numeric status code.
    ///
    /// # Errors
    ///
    /// Returns [`ResponseError::UnsupportedStatus`] if `code` is not one of
    /// 200, 400, 401, 403, 404, 500 or 503.
    pub fn new(code: u16, headers: Vec<(String, String)>, body: impl Into<String>) -> Result<Self, ResponseError> {
        let status = StatusCode::try_from(code)?;
        Ok(Self { status, headers, body: body.into() })
    }

    /// A `200 OK` response carrying `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: StatusCode::Ok, headers: Vec::new(), body: body.into() }
    }

    /// A response with an empty body and no headers.
    pub fn with_status(status: StatusCode) -> Self {
        Self { status, headers: Vec::new(), body: String::new() }
    }

    /// A response with no headers carrying `body`.
    pub fn with_body(status: StatusCode, body: impl Into<String>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    /// Appends a header; headers stay mutable until the response is serialized.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns e.g. `"200 OK"`.
    pub fn status_text(&self) -> &'static str {
        self.status.status_text()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Serializes the response to its exact wire bytes.
    pub fn to_bytes(&self) -> Bytes {
        ResponseEncoder::serialize(self)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::with_status(StatusCode::Ok)
    }
}
