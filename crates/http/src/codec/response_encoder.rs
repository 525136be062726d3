//! Response serialization.
//!
//! The wire form is produced in three steps:
//!
//! 1. the status line, `HTTP/1.1 <code> <reason>\r\n`
//! 2. the header lines joined with `\r\n`, after normalization:
//!    - no headers at all: seeded with `Content-Type: text/plain`
//!    - otherwise a missing `Content-Type` is appended as `text/plain`, and only the first
//!      of several `Content-Type` entries is kept
//!    - every `Content-Length` is removed and one computed from the body is appended
//!    - every `Connection` is removed and `Connection: close` is appended
//! 3. the body segment, `\r\n\r\n<body>`, only when the body is non-empty
//!
//! Note that an empty-body response therefore ends right after the last header line, with
//! no blank line. Header names are matched ignoring ASCII case.

use bytes::{BufMut, Bytes, BytesMut};
use http::header;
use tokio_util::codec::Encoder;

use crate::protocol::{Response, SendError};

/// Initial buffer size allocated for the status line and headers
const INIT_HEADER_SIZE: usize = 256;

/// Encoder for [`Response`] implementing the [`Encoder`] trait.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseEncoder;

impl ResponseEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Returns the exact wire bytes of `response`.
    pub fn serialize(response: &Response) -> Bytes {
        let mut dst = BytesMut::with_capacity(INIT_HEADER_SIZE + response.body().len());
        write_response(response, &mut dst);
        dst.freeze()
    }
}

impl Encoder<Response> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE + item.body().len());
        write_response(&item, dst);
        Ok(())
    }
}

fn write_response(response: &Response, dst: &mut BytesMut) {
    dst.put_slice(b"HTTP/1.1 ");
    dst.put_slice(response.status_text().as_bytes());
    dst.put_slice(b"\r\n");

    let headers = normalize_headers(response.headers(), response.body());
    for (index, (name, value)) in headers.iter().enumerate() {
        if index > 0 {
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
    }

    if !response.body().is_empty() {
        dst.put_slice(b"\r\n\r\n");
        dst.put_slice(response.body().as_bytes());
    }
}

/// Applies the framing rules to caller-supplied headers, see the module docs.
pub fn normalize_headers(headers: &[(String, String)], body: &str) -> Vec<(String, String)> {
    let mut has_content_type = false;
    let mut normalized = Vec::with_capacity(headers.len() + 3);
    for (name, value) in headers {
        if is_header(name, &header::CONNECTION) {
            continue;
        }
        if is_header(name, &header::CONTENT_TYPE) {
            // first one wins
            if has_content_type {
                continue;
            }
            has_content_type = true;
        }
        normalized.push((name.clone(), value.clone()));
    }

    if !has_content_type {
        normalized.push(("Content-Type".to_string(), mime::TEXT_PLAIN.to_string()));
    }

    normalized.retain(|(name, _)| !is_header(name, &header::CONTENT_LENGTH));
    normalized.push(("Content-Length".to_string(), body.len().to_string()));

    normalized.push(("Connection".to_string(), "close".to_string()));
    normalized
}

#[inline]
fn is_header(name: &str, header_name: &header::HeaderName) -> bool {
    name.eq_ignore_ascii_case(header_name.as_str())
}
