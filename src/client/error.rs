//! Client-engine errors.
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ClientError {
    /// The request's target was neither origin-form nor absolute-form, or
    /// an absolute-form target carried a scheme other than `http`/`https`.
    InvalidTarget,
    /// A caller-supplied `Content-Length` header was negative or not a
    /// valid integer. Caught before a connection is opened.
    InvalidContentLength,
    /// The server responded `100 Continue` was expected but the
    /// connection closed, or sent a final status before the client
    /// finished sending an `Expect: 100-continue` body.
    UnexpectedClose,
    Wire(crate::wire::WireError),
    Header(crate::headers::HeaderError),
    Body(crate::body::BodyError),
    Io(io::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::InvalidTarget => f.write_str("request target is not usable for a client request"),
            ClientError::InvalidContentLength => {
                f.write_str("request body's Content-Length is negative or not a valid integer")
            }
            ClientError::UnexpectedClose => f.write_str("connection closed unexpectedly during exchange"),
            ClientError::Wire(e) => fmt::Display::fmt(e, f),
            ClientError::Header(e) => fmt::Display::fmt(e, f),
            ClientError::Body(e) => fmt::Display::fmt(e, f),
            ClientError::Io(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Wire(e) => Some(e),
            ClientError::Header(e) => Some(e),
            ClientError::Body(e) => Some(e),
            ClientError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        ClientError::Io(e)
    }
}

impl From<crate::wire::WireError> for ClientError {
    fn from(e: crate::wire::WireError) -> Self {
        ClientError::Wire(e)
    }
}

impl From<crate::headers::HeaderError> for ClientError {
    fn from(e: crate::headers::HeaderError) -> Self {
        ClientError::Header(e)
    }
}

impl From<crate::headers::InvalidHeaderValue> for ClientError {
    fn from(e: crate::headers::InvalidHeaderValue) -> Self {
        ClientError::Header(e.into())
    }
}

impl From<crate::body::BodyError> for ClientError {
    fn from(e: crate::body::BodyError) -> Self {
        ClientError::Body(e)
    }
}
