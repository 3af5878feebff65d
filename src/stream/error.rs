//! Stream-filter errors.
use std::fmt;

/// Errors raised by the bounded reader, chunked codec, and content codec
/// stream filters.
#[derive(Debug)]
pub enum StreamError {
    /// A soft read limit (`BoundedReader::limit`) was exceeded.
    ReadLimitExceeded { limit: u64 },
    /// A chunk-size line was not a valid hex number, or a chunk was not
    /// terminated by the expected `CRLF`.
    MalformedChunk,
    /// A chunk-size exceeded the decoder's configured maximum.
    ChunkTooLarge,
    /// A `Transfer-Encoding`/`Content-Encoding` coding this crate does not
    /// implement, or a nesting depth beyond the configured maximum.
    UnsupportedCoding(String),
    Io(std::io::Error),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::ReadLimitExceeded { limit } => {
                write!(f, "read limit of {limit} bytes exceeded")
            }
            StreamError::MalformedChunk => f.write_str("malformed chunked-encoding chunk"),
            StreamError::ChunkTooLarge => f.write_str("chunk size exceeds configured maximum"),
            StreamError::UnsupportedCoding(name) => write!(f, "unsupported coding {name:?}"),
            StreamError::Io(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StreamError {
    fn from(e: std::io::Error) -> Self {
        StreamError::Io(e)
    }
}

impl From<StreamError> for std::io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(e) => e,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}
