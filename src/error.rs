//! Crate-wide error types.
//!
//! Each component owns a small hand-rolled error enum (no `thiserror`, matching
//! this crate's existing style of implementing `Display`/`Debug` by hand); the
//! top level [`Error`] wraps each family plus transport I/O failures so callers
//! that don't care about the distinction can propagate with `?`.
use std::fmt;
use std::io;

use crate::body::BodyError;
use crate::client::ClientError;
use crate::grammar::GrammarError;
use crate::headers::HeaderError;
use crate::multipart::MultipartError;
use crate::stream::StreamError;
use crate::wire::WireError;

/// Any error produced by this crate.
#[derive(Debug)]
pub enum Error {
    Grammar(GrammarError),
    Header(HeaderError),
    Stream(StreamError),
    Wire(WireError),
    Body(BodyError),
    Multipart(MultipartError),
    Client(ClientError),
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Grammar(e) => fmt::Display::fmt(e, f),
            Error::Header(e) => fmt::Display::fmt(e, f),
            Error::Stream(e) => fmt::Display::fmt(e, f),
            Error::Wire(e) => fmt::Display::fmt(e, f),
            Error::Body(e) => fmt::Display::fmt(e, f),
            Error::Multipart(e) => fmt::Display::fmt(e, f),
            Error::Client(e) => fmt::Display::fmt(e, f),
            Error::Io(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Grammar(e) => Some(e),
            Error::Header(e) => Some(e),
            Error::Stream(e) => Some(e),
            Error::Wire(e) => Some(e),
            Error::Body(e) => Some(e),
            Error::Multipart(e) => Some(e),
            Error::Client(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

impl From<GrammarError> for Error {
    fn from(e: GrammarError) -> Self { Error::Grammar(e) }
}
impl From<HeaderError> for Error {
    fn from(e: HeaderError) -> Self { Error::Header(e) }
}
impl From<StreamError> for Error {
    fn from(e: StreamError) -> Self { Error::Stream(e) }
}
impl From<WireError> for Error {
    fn from(e: WireError) -> Self { Error::Wire(e) }
}
impl From<BodyError> for Error {
    fn from(e: BodyError) -> Self { Error::Body(e) }
}
impl From<MultipartError> for Error {
    fn from(e: MultipartError) -> Self { Error::Multipart(e) }
}
impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self { Error::Client(e) }
}
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self { Error::Io(e) }
}
