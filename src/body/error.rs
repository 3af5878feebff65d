//! Body-decoding errors.
use std::fmt;
use std::io;

/// Errors surfaced while framing or decoding an entity body from the wire.
#[derive(Debug)]
pub enum BodyError {
    /// `Content-Length` was not a valid non-negative integer, or more than
    /// one `Content-Length` field with differing values was present.
    InvalidContentLength,
    /// Both `Transfer-Encoding` and `Content-Length` were present on a
    /// message where that combination is ambiguous.
    InvalidCodings,
    /// A parsed body exceeded the caller's `max_length`, distinct from a
    /// transport-level [`crate::stream::StreamError::ReadLimitExceeded`]:
    /// this is a decode-time content-size cap, not a raw-byte guard.
    EntityTooLarge { limit: u64 },
    Stream(crate::stream::StreamError),
    Io(io::Error),
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyError::InvalidContentLength => f.write_str("invalid or conflicting Content-Length"),
            BodyError::InvalidCodings => f.write_str("conflicting Transfer-Encoding and Content-Length"),
            BodyError::EntityTooLarge { limit } => write!(f, "entity exceeds the {limit} byte limit"),
            BodyError::Stream(e) => fmt::Display::fmt(e, f),
            BodyError::Io(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for BodyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BodyError::Stream(e) => Some(e),
            BodyError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BodyError {
    fn from(e: io::Error) -> Self {
        BodyError::Io(e)
    }
}

impl From<crate::stream::StreamError> for BodyError {
    fn from(e: crate::stream::StreamError) -> Self {
        BodyError::Stream(e)
    }
}

impl From<BodyError> for io::Error {
    fn from(e: BodyError) -> Self {
        match e {
            BodyError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
