//! HTTP response status code.
use std::fmt;
use std::num::NonZeroU16;

/// HTTP status code, `100`–`599`.
///
/// A full reason-phrase registry is an external data table (out of this
/// crate's scope, per spec); a handful of constants are provided for
/// convenience, but [`StatusCode::from_u16`] accepts any code in range and
/// [`canonical_reason`] only covers the codes this crate's own logic needs
/// to reason about (1xx/204/304 empty-body detection, 100-continue).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusCode(NonZeroU16);

impl StatusCode {
    pub const CONTINUE: StatusCode = StatusCode::known(100);
    pub const SWITCHING_PROTOCOLS: StatusCode = StatusCode::known(101);
    pub const OK: StatusCode = StatusCode::known(200);
    pub const NO_CONTENT: StatusCode = StatusCode::known(204);
    pub const NOT_MODIFIED: StatusCode = StatusCode::known(304);
    pub const BAD_REQUEST: StatusCode = StatusCode::known(400);
    pub const NOT_FOUND: StatusCode = StatusCode::known(404);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode::known(500);

    const fn known(code: u16) -> StatusCode {
        match NonZeroU16::new(code) {
            Some(v) => StatusCode(v),
            None => panic!("status code must be non-zero"),
        }
    }

    /// Validates and wraps a numeric status code. Must be in `100..=599`.
    pub const fn from_u16(code: u16) -> Result<StatusCode, InvalidStatusCode> {
        if code < 100 || code > 599 {
            return Err(InvalidStatusCode);
        }
        // SAFETY: range checked above excludes zero.
        Ok(StatusCode(unsafe { NonZeroU16::new_unchecked(code) }))
    }

    /// Returns the numeric status code.
    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0.get()
    }

    /// Returns `true` for informational (1xx) codes.
    #[inline]
    pub const fn is_informational(&self) -> bool {
        self.as_u16() < 200
    }

    /// `true` for `1xx`, `204`, and `304` — the statuses whose responses
    /// are defined to have no body regardless of headers present.
    #[inline]
    pub const fn forbids_body(&self) -> bool {
        self.is_informational() || self.as_u16() == 204 || self.as_u16() == 304
    }
}

/// Returns a short canonical reason phrase for well-known codes, used when
/// emitting a response without a caller-supplied reason phrase. Not an
/// exhaustive IANA registry.
pub const fn canonical_reason(code: u16) -> &'static str {
    match code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        303 => "See Other",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        409 => "Conflict",
        411 => "Length Required",
        413 => "Content Too Large",
        415 => "Unsupported Media Type",
        417 => "Expectation Failed",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "",
    }
}

impl Default for StatusCode {
    #[inline]
    fn default() -> Self {
        StatusCode::OK
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_u16(), f)
    }
}

impl fmt::Debug for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StatusCode").field(&self.as_u16()).finish()
    }
}

/// Error returned when a status code is outside `100..=599`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidStatusCode;

impl fmt::Display for InvalidStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("status code must be in the range 100..=599")
    }
}

impl std::error::Error for InvalidStatusCode {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_range() {
        assert!(StatusCode::from_u16(100).is_ok());
        assert!(StatusCode::from_u16(599).is_ok());
        assert!(StatusCode::from_u16(99).is_err());
        assert!(StatusCode::from_u16(600).is_err());
    }

    #[test]
    fn forbids_body_matrix() {
        assert!(StatusCode::CONTINUE.forbids_body());
        assert!(StatusCode::NO_CONTENT.forbids_body());
        assert!(StatusCode::NOT_MODIFIED.forbids_body());
        assert!(!StatusCode::OK.forbids_body());
    }
}
