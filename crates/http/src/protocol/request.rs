//! HTTP request representation.
//!
//! A [`Request`] is produced once by the request parser and then handed, by value, to the
//! matched route handler. It is never mutated after construction.

use tracing::debug;

use crate::protocol::Method;

/// A parsed HTTP request.
///
/// Headers are kept as an ordered list of `(name, value)` pairs: duplicates, arrival order
/// and the original casing of names are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    path: String,
    query_string: String,
    headers: Vec<(String, String)>,
    body: String,
    preserve_body: bool,
}

impl Request {
    pub fn builder(method: Method, path: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, path)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// The request target without its query component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query component, not decoded.
    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the value of the first header whose name matches, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn preserve_body(&self) -> bool {
        self.preserve_body
    }
}

/// Builder for [`Request`].
///
/// [`build`](RequestBuilder::build) applies the body policy: a GET or DELETE request loses its
/// body unless `preserve_body` was set.
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    path: String,
    query_string: String,
    headers: Vec<(String, String)>,
    body: String,
    preserve_body: bool,
}

impl RequestBuilder {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_string: String::new(),
            headers: Vec::new(),
            body: String::new(),
            preserve_body: false,
        }
    }

    #[must_use]
    pub fn query_string(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = query_string.into();
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn preserve_body(mut self, preserve_body: bool) -> Self {
        self.preserve_body = preserve_body;
        self
    }

    pub fn build(self) -> Request {
        let Self { method, path, query_string, headers, mut body, preserve_body } = self;

        if method.is_bodiless() && !body.is_empty() {
            if preserve_body {
                debug!(%method, %path, "request includes a body where none is expected, but preserve_body is set");
            } else {
                debug!(%method, %path, "request includes a body where none is expected, discarding");
                body.clear();
            }
        }

        Request { method, path, query_string, headers, body, preserve_body }
    }
}
