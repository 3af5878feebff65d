//! Header-level errors.
use std::fmt;

use super::name::InvalidHeaderName;
use super::value::InvalidHeaderValue;

/// Errors surfaced by the header model: malformed names/values on
/// construction, and lookups against headers the wire codec never saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// A header name failed the `token` grammar.
    Name(InvalidHeaderName),
    /// A header value contained a disallowed byte.
    Value(InvalidHeaderValue),
    /// A required header was absent.
    NotFound { name: String },
    /// A header was present but its value did not parse as the requested
    /// typed representation (e.g. `Content-Length: abc`).
    Malformed { name: String },
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Name(e) => fmt::Display::fmt(e, f),
            HeaderError::Value(e) => fmt::Display::fmt(e, f),
            HeaderError::NotFound { name } => write!(f, "header {name:?} not found"),
            HeaderError::Malformed { name } => write!(f, "header {name:?} is malformed"),
        }
    }
}

impl std::error::Error for HeaderError {}

impl From<InvalidHeaderName> for HeaderError {
    fn from(e: InvalidHeaderName) -> Self {
        HeaderError::Name(e)
    }
}

impl From<InvalidHeaderValue> for HeaderError {
    fn from(e: InvalidHeaderValue) -> Self {
        HeaderError::Value(e)
    }
}
