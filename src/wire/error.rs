//! Wire-level (start-line and header-block) parsing errors.
use std::fmt;

#[derive(Debug)]
pub enum WireError {
    /// A line (start-line or header field) exceeded the configured maximum
    /// length before a terminating `CRLF` was found.
    LineTooLong,
    /// The header block contained more fields than the configured maximum.
    TooManyHeaders,
    /// The request-line or status-line did not match its grammar.
    MalformedStartLine,
    /// A header field line did not match `field-name ":" OWS field-value OWS`,
    /// or used obsolete line-folding (a continuation line starting with
    /// whitespace), which this crate rejects rather than unfolds.
    MalformedHeader,
    Io(std::io::Error),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::LineTooLong => f.write_str("line exceeds the configured maximum length"),
            WireError::TooManyHeaders => f.write_str("header block exceeds the configured maximum field count"),
            WireError::MalformedStartLine => f.write_str("malformed request-line or status-line"),
            WireError::MalformedHeader => f.write_str("malformed header field"),
            WireError::Io(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for WireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WireError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for WireError {
    fn from(e: std::io::Error) -> Self {
        WireError::Io(e)
    }
}

impl From<WireError> for std::io::Error {
    fn from(e: WireError) -> Self {
        match e {
            WireError::Io(e) => e,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}
