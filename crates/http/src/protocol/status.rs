use std::fmt::{Display, Formatter};

use crate::protocol::ResponseError;

/// The fixed set of status codes a [`Response`](crate::protocol::Response) may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusCode {
    #[default]
    Ok,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
    ServiceUnavailable,
}

/// code, status text (code and reason phrase as written on the status line)
const STATUS_TABLE: [(StatusCode, u16, &str); 7] = [
    (StatusCode::Ok, 200, "200 OK"),
    (StatusCode::BadRequest, 400, "400 Bad Request"),
    (StatusCode::Unauthorized, 401, "401 Unauthorized"),
    (StatusCode::Forbidden, 403, "403 Forbidden"),
    (StatusCode::NotFound, 404, "404 Not Found"),
    (StatusCode::InternalServerError, 500, "500 Internal Server Error"),
    (StatusCode::ServiceUnavailable, 503, "503 Service Unavailable"),
];

impl StatusCode {
    pub const ALL: [StatusCode; 7] = [
        Self::Ok,
        Self::BadRequest,
        Self::Unauthorized,
        Self::Forbidden,
        Self::NotFound,
        Self::InternalServerError,
        Self::ServiceUnavailable,
    ];

    fn entry(self) -> (StatusCode, u16, &'static str) {
        STATUS_TABLE[self as usize]
    }

    pub fn as_u16(self) -> u16 {
        self.entry().1
    }

    /// Returns e.g. `"404 Not Found"`.
    pub fn status_text(self) -> &'static str {
        self.entry().2
    }

    pub fn reason_phrase(self) -> &'static str {
        let text = self.status_text();
        text.split_once(' ').map_or(text, |(_, reason)| reason)
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = ResponseError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        STATUS_TABLE
            .iter()
            .find(|(_, value, _)| *value == code)
            .map(|(status, _, _)| *status)
            .ok_or(ResponseError::UnsupportedStatus { code })
    }
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status.as_u16()
    }
}

impl Display for StatusCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_text())
    }
}
