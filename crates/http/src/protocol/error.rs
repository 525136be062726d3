use std::io;
use thiserror::Error;

use crate::protocol::Method;

/// Errors returned by [`HttpConnection::process`](crate::connection::HttpConnection::process).
///
/// Only transport failures reach this type: every protocol-level failure is turned into
/// an HTTP response before the connection is closed.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("method: {method} is not a standard method and not implemented")]
    UnsupportedMethod { method: String },

    #[error("method: {method} is not implemented")]
    NotImplementedMethod { method: String },

    #[error("malformed request line: {reason}")]
    MalformedRequestLine { reason: String },

    /// The stream ended before the delimiter. `read` is the number of bytes consumed by the
    /// failed read, not a fixed zero, so truncated requests can be told apart from empty ones.
    #[error("delimiter not found in request, stream ended after {read} bytes")]
    IncompleteData { read: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn unsupported_method<S: ToString>(method: S) -> Self {
        Self::UnsupportedMethod { method: method.to_string() }
    }

    pub fn not_implemented_method<S: ToString>(method: S) -> Self {
        Self::NotImplementedMethod { method: method.to_string() }
    }

    pub fn malformed_request_line<S: ToString>(str: S) -> Self {
        Self::MalformedRequestLine { reason: str.to_string() }
    }

    pub fn incomplete_data(read: usize) -> Self {
        Self::IncompleteData { read }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Returns true if the failure came from the transport rather than from the request bytes.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("no route matched {method} {path}")]
    NotFound { method: Method, path: String },

    #[error("there are no routes registered")]
    NoRoutesRegistered,
}

impl RouteError {
    pub fn not_found<S: ToString>(method: Method, path: S) -> Self {
        Self::NotFound { method, path: path.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("bad handler result: {reason}")]
    BadHandlerResult { reason: String },
}

impl InvokeError {
    pub fn bad_handler_result<S: ToString>(str: S) -> Self {
        Self::BadHandlerResult { reason: str.to_string() }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ResponseError {
    #[error("http code ({code}) not implemented")]
    UnsupportedStatus { code: u16 },
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
