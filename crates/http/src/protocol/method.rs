use std::fmt::{Display, Formatter};

use crate::protocol::ParseError;

/// The request methods this server dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

/// Standard methods that are recognized on the wire but never served.
const UNIMPLEMENTED_METHODS: [&str; 3] = ["PATCH", "CONNECT", "TRACE"];

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
        }
    }

    /// Methods whose requests are not expected to carry a body.
    pub fn is_bodiless(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }
}

impl TryFrom<&str> for Method {
    type Error = ParseError;

    /// Tokens are matched case-sensitively, as sent on the request line.
    fn try_from(str: &str) -> Result<Self, Self::Error> {
        match str {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "OPTIONS" => Ok(Self::Options),
            s if UNIMPLEMENTED_METHODS.contains(&s) => Err(ParseError::not_implemented_method(s)),
            s => Err(ParseError::unsupported_method(s)),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
